// Copyright (C) Microsoft Corporation. All rights reserved.

#![warn(missing_docs)]

//! Device Driver Interface (DDI) library

pub use enigma_ddi_interface::*;

cfg_if::cfg_if! {
    if #[cfg(feature = "mock")] {
        /// Enigma DDI implementation
        pub type EnigmaDdi = enigma_ddi_mock::DdiMock;
    } else {
        /// Enigma DDI implementation
        pub type EnigmaDdi = enigma_ddi_native::DdiNative;
    }
}
