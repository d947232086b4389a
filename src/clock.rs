// Copyright (c) 2025 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{sync::Arc, time::SystemTime};

/// Source of the current time for a [crate::WindowedSample].
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

/// Wall clock (UTC) time source used in production.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    #[inline]
    fn now(&self) -> SystemTime {
        (**self).now()
    }
}
