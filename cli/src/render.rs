//! Plain-text output for the CLI.

use std::fmt::Write;

use personnel_core::{OperationResult, Pagination, Person};

pub fn list(persons: &[Person], pagination: &Pagination) -> String {
    let mut out = String::new();
    if persons.is_empty() {
        out.push_str("no people found\n");
    }
    for p in persons {
        let _ = writeln!(
            out,
            "{:<38} {:<20} {:<14} {:<20} {:<8} {}",
            p.id, p.name, p.department, p.position, p.status, p.email
        );
    }
    if pagination.total > 0 {
        let _ = writeln!(
            out,
            "{pagination}  (page {} of {}{}{})",
            pagination.page,
            pagination.total_pages(),
            if pagination.has_prev { ", prev" } else { "" },
            if pagination.has_next { ", next" } else { "" },
        );
    }
    out
}

pub fn detail(p: &Person) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", p.name, p.id);
    let _ = writeln!(out, "  position:   {} / {}", p.position, p.department);
    let _ = writeln!(out, "  status:     {}", p.status);
    let _ = writeln!(out, "  email:      {}", p.email);
    let _ = writeln!(out, "  phone:      {}", p.phone);
    let _ = writeln!(out, "  location:   {}", p.location);
    let _ = writeln!(out, "  joined:     {}", p.join_date);
    if let Some(avatar) = &p.avatar {
        let _ = writeln!(out, "  avatar:     {avatar}");
    }
    if let Some(skills) = p.skills.as_ref().filter(|s| !s.is_empty()) {
        let _ = writeln!(out, "  skills:     {}", skills.join(", "));
    }
    if let Some(bio) = &p.bio {
        let _ = writeln!(out, "  bio:        {bio}");
    }
    out
}

pub fn outcome(result: &OperationResult) -> String {
    let verdict = if result.success { "ok" } else { "failed" };
    format!("{verdict}: {}", result.message)
}
