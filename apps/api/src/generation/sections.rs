//! Per-entry renderers and section assemblers.
//!
//! Entry renderers turn one record into a heading call. Section assemblers return
//! `None` when nothing would be shown, so the caller never emits a bare heading.

use crate::generation::dates::format_date;
use crate::generation::markup::{Arg, ArgLayout, Block, Body, Call, Expr, ListItem, Section, Span};
use crate::models::resume::{
    Achievement, Education, Leadership, Project, ResumeData, SectionId, SkillCategory,
    WorkExperience,
};

const MULTILINE: ArgLayout = ArgLayout::Block {
    trailing_comma: false,
};

// ────────────────────────────────────────────────────────────────────────────
// Shared pieces
// ────────────────────────────────────────────────────────────────────────────

/// Non-blank bullets as list items, in input order.
fn bullet_body(bullets: &[String]) -> Body {
    Body::bullets(
        bullets
            .iter()
            .filter(|b| !b.trim().is_empty())
            .map(|b| ListItem::text(b))
            .collect(),
    )
}

/// `"Present"` for ongoing entries, otherwise the formatted end date.
fn end_date(end: &str, is_present: bool) -> Expr {
    if is_present {
        Expr::Present
    } else {
        Expr::Date(format_date(end))
    }
}

fn positional(text: &str) -> Arg {
    Arg::Positional(Expr::str(text))
}

// ────────────────────────────────────────────────────────────────────────────
// Entry renderers
// ────────────────────────────────────────────────────────────────────────────

pub fn education_entry(edu: &Education) -> Block {
    Block::Call(Call {
        name: "education-heading",
        args: vec![
            positional(&edu.institution),
            positional(&edu.location),
            positional(&edu.degree),
            positional(&edu.major),
            Arg::Positional(Expr::Date(format_date(&edu.start_date))),
            Arg::Positional(end_date(&edu.end_date, edu.is_present)),
        ],
        layout: MULTILINE,
        body: Some(bullet_body(&edu.bullets)),
    })
}

pub fn project_entry(project: &Project) -> Block {
    Block::Call(Call {
        name: "project-heading",
        args: vec![
            positional(&project.name),
            Arg::Named("stack", Expr::str(&project.stack)),
            Arg::Named("project-url", Expr::str(&project.url)),
            Arg::Named("award", Expr::str(&project.award)),
        ],
        layout: MULTILINE,
        body: Some(bullet_body(&project.bullets)),
    })
}

pub fn work_entry(work: &WorkExperience) -> Block {
    work_heading(
        &work.title,
        &work.company,
        &work.location,
        &work.start_date,
        end_date(&work.end_date, work.is_present),
        &work.bullets,
    )
}

/// Leadership roles share the work layout, with the organization in the company slot.
pub fn leadership_entry(lead: &Leadership) -> Block {
    work_heading(
        &lead.title,
        &lead.organization,
        &lead.location,
        &lead.start_date,
        end_date(&lead.end_date, lead.is_present),
        &lead.bullets,
    )
}

fn work_heading(
    title: &str,
    organization: &str,
    location: &str,
    start: &str,
    end: Expr,
    bullets: &[String],
) -> Block {
    Block::Call(Call {
        name: "work-heading",
        args: vec![
            positional(title),
            positional(organization),
            positional(location),
            Arg::Positional(Expr::Date(format_date(start))),
            Arg::Positional(end),
        ],
        layout: MULTILINE,
        body: Some(bullet_body(bullets)),
    })
}

/// The title is always shown; the date and description only when present.
pub fn achievement_entry(achievement: &Achievement) -> Block {
    let description = (!achievement.description.trim().is_empty())
        .then(|| achievement.description.clone());

    Block::Call(Call {
        name: "achievement-heading",
        args: vec![positional(&achievement.title), positional(&achievement.date)],
        layout: ArgLayout::Inline,
        body: Some(Body::Text(description)),
    })
}

fn skill_item(skill: &SkillCategory) -> Option<ListItem> {
    if skill.category.trim().is_empty() || skill.skills.trim().is_empty() {
        return None;
    }
    Some(ListItem(vec![
        Span::Strong(format!("{}:", skill.category)),
        Span::Text(format!(" {}", skill.skills)),
    ]))
}

// ────────────────────────────────────────────────────────────────────────────
// Section assemblers
// ────────────────────────────────────────────────────────────────────────────

pub fn profile_section(summary: &str) -> Option<Section> {
    if summary.trim().is_empty() {
        return None;
    }
    Some(Section {
        title: SectionId::Profile.label(),
        blocks: vec![Block::Paragraph(summary.to_string())],
    })
}

fn entry_section<T>(title: &'static str, entries: &[T], render: fn(&T) -> Block) -> Option<Section> {
    if entries.is_empty() {
        return None;
    }
    Some(Section {
        title,
        blocks: entries.iter().map(render).collect(),
    })
}

pub fn education_section(entries: &[Education]) -> Option<Section> {
    entry_section(SectionId::Education.label(), entries, education_entry)
}

pub fn projects_section(entries: &[Project]) -> Option<Section> {
    entry_section(SectionId::Projects.label(), entries, project_entry)
}

pub fn experience_section(entries: &[WorkExperience]) -> Option<Section> {
    entry_section(SectionId::Experience.label(), entries, work_entry)
}

pub fn leadership_section(entries: &[Leadership]) -> Option<Section> {
    entry_section(SectionId::Leadership.label(), entries, leadership_entry)
}

/// Only categories with both a label and a skill list are shown.
pub fn skills_section(skills: &[SkillCategory]) -> Option<Section> {
    let items: Vec<ListItem> = skills.iter().filter_map(skill_item).collect();
    if items.is_empty() {
        return None;
    }
    Some(Section {
        title: SectionId::Skills.label(),
        blocks: vec![Block::Call(Call {
            name: "skills",
            args: vec![],
            layout: ArgLayout::Inline,
            body: Some(Body::List { indent: "", items }),
        })],
    })
}

/// Entries with a blank title are dropped.
pub fn achievements_section(achievements: &[Achievement]) -> Option<Section> {
    let blocks: Vec<Block> = achievements
        .iter()
        .filter(|a| !a.title.trim().is_empty())
        .map(achievement_entry)
        .collect();
    if blocks.is_empty() {
        return None;
    }
    Some(Section {
        title: "Achievements / Certifications",
        blocks,
    })
}

/// Assembles the section for `id` from the record.
pub fn section_for(id: SectionId, data: &ResumeData) -> Option<Section> {
    match id {
        SectionId::Profile => profile_section(&data.profile.summary),
        SectionId::Education => education_section(&data.education),
        SectionId::Projects => projects_section(&data.projects),
        SectionId::Experience => experience_section(&data.work_experience),
        SectionId::Leadership => leadership_section(&data.leadership),
        SectionId::Skills => skills_section(&data.skills),
        SectionId::Achievements => achievements_section(&data.achievements),
    }
}
