#![allow(dead_code)]

use anyhow::Result;
use license_calc::models::RawRow;
use std::fs;
use std::path::{Path, PathBuf};

pub const HEADER: &str = "ComputerID,UserID,ApplicationID,ComputerType,Comment";

pub fn row(device: &str, user: &str, app: &str, kind: &str) -> RawRow {
    vec![
        device.to_string(),
        user.to_string(),
        app.to_string(),
        kind.to_string(),
        "Exported from System A".to_string(),
    ]
}

pub fn create_test_csv(dir: &Path, filename: &str, rows: &[RawRow]) -> Result<PathBuf> {
    let mut content = String::from(HEADER);
    content.push('\n');
    for row in rows {
        content.push_str(&row.join(","));
        content.push('\n');
    }

    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Deterministic ledger with `users` users spread over two applications.
///
/// Every identity appears at most twice and both copies are identical, so
/// the expected total does not depend on which copy wins.
pub fn generate_ledger(users: usize, seed: u64) -> Vec<RawRow> {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 33) as usize
    };

    let mut rows = Vec::new();
    let mut device = 0usize;
    for user in 0..users {
        let devices = next() % 6;
        for _ in 0..devices {
            device += 1;
            let app = if next() % 4 == 0 { "999" } else { "374" };
            let kind = match next() % 5 {
                0 => "laptop",
                1 | 2 => "DESKTOP",
                3 => "LAPTOP",
                _ => "TABLET",
            };
            let r = row(&device.to_string(), &format!("U{}", user), app, kind);
            if next() % 7 == 0 {
                rows.push(r.clone());
            }
            rows.push(r);
        }
    }
    rows
}

/// Reference answer: sum over users of max(laptops, desktops) after dropping
/// repeated identities and other applications.
pub fn expected_copies(rows: &[RawRow], app_id: &str) -> u64 {
    use std::collections::{HashMap, HashSet};

    let mut seen = HashSet::new();
    let mut counts: HashMap<&str, (u64, u64)> = HashMap::new();
    for r in rows {
        if r[2] != app_id {
            continue;
        }
        let kind = r[3].to_ascii_uppercase();
        if kind != "LAPTOP" && kind != "DESKTOP" {
            continue;
        }
        if !seen.insert((r[0].as_str(), r[1].as_str(), r[2].as_str())) {
            continue;
        }
        let entry = counts.entry(r[1].as_str()).or_default();
        if kind == "LAPTOP" {
            entry.0 += 1;
        } else {
            entry.1 += 1;
        }
    }
    counts.values().map(|(l, d)| (*l).max(*d)).sum()
}
