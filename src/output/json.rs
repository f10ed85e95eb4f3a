//
//  bamboo-cli
//  output/json.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! JSON output for `--json`.
//!
//! Output is pretty-printed and newline-terminated so it can be piped
//! straight into `jq`.

use serde::Serialize;
use std::io::{self, Write};

/// Writes `value` to stdout as pretty JSON.
pub fn write_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json_to(&mut handle, value)
}

/// Writes `value` to `writer` as pretty JSON followed by a newline.
pub fn write_json_to<W: Write, T: Serialize + ?Sized>(
    writer: &mut W,
    value: &T,
) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_json_to_is_pretty_and_terminated() {
        let mut out = Vec::new();
        write_json_to(&mut out, &serde_json::json!({"number": "22"})).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\n  \"number\": \"22\"\n}\n");
    }

    #[test]
    fn test_write_json_to_slice() {
        let mut out = Vec::new();
        write_json_to(&mut out, &["AAA", "BBB"][..]).unwrap();
        let parsed: Vec<String> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed, vec!["AAA", "BBB"]);
    }
}
