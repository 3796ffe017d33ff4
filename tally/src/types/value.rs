/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointValue {
    Double(f64),
    Signed(i64),
}

impl fmt::Display for PointValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointValue::Signed(i) => itoa::Buffer::new().format(*i).fmt(f),
            PointValue::Double(v) => ryu::Buffer::new().format(*v).fmt(f),
        }
    }
}
