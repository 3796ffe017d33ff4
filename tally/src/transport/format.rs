/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

//! Wavefront data format
//!
//! `"<metric>" <value> [<timestamp>] source="<source>" ["<k>"="<v>"] ...`

use std::fmt::Write;

use crate::types::{DataPoint, PointKind};

const DELTA_PREFIX: char = '\u{2206}';

fn push_escaped(buf: &mut String, s: &str) {
    if memchr::memchr(b'"', s.as_bytes()).is_none() {
        buf.push_str(s);
        return;
    }
    for c in s.chars() {
        if c == '"' {
            buf.push('\\');
        }
        buf.push(c);
    }
}

fn push_quoted(buf: &mut String, s: &str) {
    buf.push('"');
    push_escaped(buf, s);
    buf.push('"');
}

/// Append the line of a single point, with the trailing newline
pub fn write_line(buf: &mut String, source: &str, point: &DataPoint) {
    buf.push('"');
    if point.kind() == PointKind::DeltaCounter {
        buf.push(DELTA_PREFIX);
    }
    push_escaped(buf, point.name().as_str());
    buf.push('"');

    buf.push(' ');
    let _ = write!(buf, "{}", point.value());

    // delta points are aggregated by the backend, the timestamp is assigned there
    if point.kind() != PointKind::DeltaCounter {
        buf.push(' ');
        buf.push_str(itoa::Buffer::new().format(point.timestamp().timestamp()));
    }

    buf.push_str(" source=");
    push_quoted(buf, source);

    for (name, value) in point.tags().iter() {
        buf.push(' ');
        push_quoted(buf, name.as_str());
        buf.push('=');
        push_quoted(buf, value.as_str());
    }
    buf.push('\n');
}

pub fn format_batch(source: &str, batch: &[DataPoint]) -> String {
    let mut buf = String::with_capacity(batch.len() * 128);
    for point in batch {
        write_line(&mut buf, source, point);
    }
    buf
}
