use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Resume record (owned by the caller, read-only to the generator)
// ────────────────────────────────────────────────────────────────────────────

/// Contact details shown under the name. An empty string means "absent".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonalInfo {
    pub name: String,
    pub phone: String,
    pub location: String,
    pub email: String,
    pub website: String,
    pub linkedin: String,
    pub github: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkExperience {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    /// `YYYY-MM` or empty.
    pub start_date: String,
    /// `YYYY-MM` or empty. Ignored when `is_present` is set.
    pub end_date: String,
    pub is_present: bool,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub stack: String,
    pub url: String,
    /// Free-form label, e.g. "NexHacks 2026 (1st Place)".
    pub award: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Education {
    pub id: String,
    pub institution: String,
    pub location: String,
    pub degree: String,
    pub major: String,
    pub start_date: String,
    pub end_date: String,
    pub is_present: bool,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Leadership {
    pub id: String,
    pub title: String,
    pub organization: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub is_present: bool,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SkillCategory {
    pub id: String,
    pub category: String,
    pub skills: String,
}

/// Hex color strings, e.g. `#22227f`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColorSettings {
    pub head_color: String,
    pub text_color: String,
    pub accent_color: String,
    pub link_color: String,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            head_color: "#22227f".to_string(),
            text_color: "#1b1b1b".to_string(),
            accent_color: "#22328A".to_string(),
            link_color: "#1d4ed8".to_string(),
        }
    }
}

/// Point sizes for the four text roles of the template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FontSettings {
    pub base_size: f64,
    pub contact_size: f64,
    pub heading_size: f64,
    pub name_size: f64,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            base_size: 10.0,
            contact_size: 10.0,
            heading_size: 13.0,
            name_size: 22.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionId {
    Profile,
    Education,
    Projects,
    Experience,
    Leadership,
    Skills,
    Achievements,
}

impl SectionId {
    pub const ALL: [SectionId; 7] = [
        SectionId::Profile,
        SectionId::Education,
        SectionId::Projects,
        SectionId::Experience,
        SectionId::Leadership,
        SectionId::Skills,
        SectionId::Achievements,
    ];

    /// Label shown in the editor's section list.
    pub fn label(self) -> &'static str {
        match self {
            SectionId::Profile => "Profile",
            SectionId::Education => "Education",
            SectionId::Projects => "Projects",
            SectionId::Experience => "Experience",
            SectionId::Leadership => "Leadership",
            SectionId::Skills => "Skills",
            SectionId::Achievements => "Achievements",
        }
    }
}

/// The full resume record.
///
/// `section_order` decides both inclusion and order: a section renders only if it
/// is listed there and has non-blank content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeData {
    pub personal_info: PersonalInfo,
    pub profile: Profile,
    pub education: Vec<Education>,
    pub projects: Vec<Project>,
    pub work_experience: Vec<WorkExperience>,
    pub leadership: Vec<Leadership>,
    pub skills: Vec<SkillCategory>,
    pub achievements: Vec<Achievement>,
    pub colors: ColorSettings,
    pub fonts: FontSettings,
    pub section_order: Vec<SectionId>,
}

impl Default for ResumeData {
    fn default() -> Self {
        Self {
            personal_info: PersonalInfo::default(),
            profile: Profile::default(),
            education: Vec::new(),
            projects: Vec::new(),
            work_experience: Vec::new(),
            leadership: Vec::new(),
            skills: Vec::new(),
            achievements: Vec::new(),
            colors: ColorSettings::default(),
            fonts: FontSettings::default(),
            section_order: SectionId::ALL.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_section_order_lists_every_section_once() {
        let data = ResumeData::default();
        assert_eq!(data.section_order.len(), 7);
        assert_eq!(data.section_order[0], SectionId::Profile);
        assert_eq!(data.section_order[6], SectionId::Achievements);
    }

    #[test]
    fn test_resume_data_deserializes_camel_case_wire_format() {
        let json = serde_json::json!({
            "personalInfo": { "name": "Ada Lovelace", "github": "ada" },
            "workExperience": [{
                "id": "w1",
                "title": "Analyst",
                "company": "Engine Co",
                "startDate": "1842-01",
                "isPresent": true,
                "bullets": ["Wrote the first program"]
            }],
            "sectionOrder": ["experience", "skills"]
        });

        let data: ResumeData = serde_json::from_value(json).unwrap();
        assert_eq!(data.personal_info.name, "Ada Lovelace");
        assert_eq!(data.personal_info.phone, "", "missing fields default to blank");
        assert_eq!(data.work_experience[0].start_date, "1842-01");
        assert!(data.work_experience[0].is_present);
        assert_eq!(
            data.section_order,
            vec![SectionId::Experience, SectionId::Skills]
        );
        assert_eq!(data.colors, ColorSettings::default());
    }

    #[test]
    fn test_unknown_section_id_is_rejected() {
        let json = serde_json::json!({ "sectionOrder": ["hobbies"] });
        let result: Result<ResumeData, _> = serde_json::from_value(json);
        assert!(result.is_err(), "sectionOrder is a closed set");
    }

    #[test]
    fn test_section_labels() {
        assert_eq!(SectionId::Experience.label(), "Experience");
        assert_eq!(SectionId::Achievements.label(), "Achievements");
    }
}
