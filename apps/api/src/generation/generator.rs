//! Document generation: `ResumeData` → complete Typst main file.
//!
//! Output order: color bindings, size bindings, helper library, page template
//! invocation, then the ordered sections separated by blank lines. Pure and
//! infallible: partial input yields partial output, and anything the engine
//! rejects surfaces at compile time.

use std::collections::HashSet;

use crate::generation::markup::{Arg, ArgLayout, Block, Call, Expr};
use crate::generation::preamble::{color_bindings, size_bindings, HELPER_LIBRARY};
use crate::generation::sections::section_for;
use crate::models::resume::{PersonalInfo, ResumeData};

/// Generates the Typst source for `data`.
pub fn generate(data: &ResumeData) -> String {
    let body = render_sections(data);

    format!(
        "{}{}{}\n\n{}\n\n{}\n",
        color_bindings(&data.colors),
        size_bindings(&data.fonts),
        HELPER_LIBRARY,
        page_invocation(&data.personal_info).render(),
        body
    )
}

/// Renders sections in `section_order`, skipping repeats and anything blank.
///
/// The blank check runs on the rendered text, after the per-section filters.
fn render_sections(data: &ResumeData) -> String {
    let mut seen = HashSet::new();
    data.section_order
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .filter_map(|id| section_for(id, data))
        .map(|section| section.render())
        .filter(|rendered| !rendered.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// `#show: resume.with(...)` carrying the contact details.
fn page_invocation(info: &PersonalInfo) -> Block {
    let named = |name: &'static str, value: &str| Arg::Named(name, Expr::str(value));

    Block::Show(Call {
        name: "resume.with",
        args: vec![
            named("author-name", &info.name),
            named("email", &info.email),
            named("phone", &info.phone),
            named("location", &info.location),
            named("website", &info.website),
            named("linkedin-user-id", &info.linkedin),
            named("github-username", &info.github),
        ],
        layout: ArgLayout::Block {
            trailing_comma: true,
        },
        body: None,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
