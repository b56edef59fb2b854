//! Address tokens in access logs, counted exactly and approximately.

use crate::cardinality::hll::HyperLogLog;
use crate::cardinality::Cardinality;
use crate::error::ConfigurationError;
use std::collections::HashSet;
use std::io::{self, BufRead};

/// Returns the first dotted-quad token (`d{1,3}.d{1,3}.d{1,3}.d{1,3}`) that
/// stands on word boundaries. Octets are not range checked.
pub fn extract_ip(line: &str) -> Option<&str> {
    let bytes = line.as_bytes();
    (0..bytes.len())
        .filter(|&start| bytes[start].is_ascii_digit() && !line[..start].ends_with(is_word))
        .find_map(|start| {
            let end = start + dotted_quad_len(&bytes[start..])?;
            (!line[end..].starts_with(is_word)).then(|| &line[start..end])
        })
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn dotted_quad_len(bytes: &[u8]) -> Option<usize> {
    let mut pos = 0;
    for octet in 0..4 {
        let digits = bytes[pos..]
            .iter()
            .take(3)
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits == 0 {
            return None;
        }
        pos += digits;
        if octet < 3 {
            if bytes.get(pos) != Some(&b'.') {
                return None;
            }
            pos += 1;
        }
    }
    Some(pos)
}

/// Collects the first address of every line, skipping lines without one.
/// Invalid UTF-8 is replaced rather than rejected.
pub fn load_ips<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut ips = Vec::new();
    let mut skipped = 0usize;
    for line in reader.split(b'\n') {
        let line = line?;
        match extract_ip(&String::from_utf8_lossy(&line)) {
            Some(ip) => ips.push(ip.to_owned()),
            None => skipped += 1,
        }
    }
    tracing::debug!(found = ips.len(), skipped, "loaded addresses");
    Ok(ips)
}

pub fn count_unique_exact<S: AsRef<str>>(ips: &[S]) -> usize {
    ips.iter().map(|ip| ip.as_ref()).collect::<HashSet<&str>>().len()
}

pub fn count_unique_approx<S: AsRef<str>>(
    ips: &[S],
    precision: u8,
) -> Result<f64, ConfigurationError> {
    let mut hll = HyperLogLog::new(precision)?;
    for ip in ips {
        hll.insert(ip.as_ref());
    }
    Ok(hll.estimate())
}
