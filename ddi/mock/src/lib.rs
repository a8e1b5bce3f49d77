// Copyright (C) Microsoft Corporation. All rights reserved.

#![warn(missing_docs)]

//! DDI Implementation - Enigma Mock Device
//!
//! Stands in for the vendor libraries in tests. Data transforms are a
//! reversible byte mask, not cryptography.

mod ddi;
mod dev;
mod state;
mod xmss;

pub use ddi::DdiMock;
pub use dev::DdiMockDev;
pub use state::MockConfig;
pub use state::DEFAULT_PIN;
pub use xmss::DdiMockXmssDev;
