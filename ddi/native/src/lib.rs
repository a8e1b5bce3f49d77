// Copyright (C) Microsoft Corporation. All rights reserved.

#![warn(missing_docs)]

//! DDI Implementation - vendor dynamic libraries loaded at run time

mod ddi;
mod dev;
mod library;
mod xmss;

pub use ddi::DdiNative;
pub use dev::DdiNativeDev;
pub use xmss::DdiNativeXmssDev;
