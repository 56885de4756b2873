//! Collection-mode wire types: input config and ranked output JSON.

use serde::{Deserialize, Serialize};

use super::Section;

/// Challenge identification block of the input config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeInfo {
    pub challenge_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_case_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One input document reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRef {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// The persona on whose behalf sections are ranked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub role: String,
}

/// The task the persona wants to accomplish.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobToBeDone {
    pub task: String,
}

/// Per-collection input configuration (`config.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    pub challenge_info: ChallengeInfo,
    pub documents: Vec<DocumentRef>,
    pub persona: Persona,
    pub job_to_be_done: JobToBeDone,
}

impl CollectionConfig {
    /// Combined free-text relevance query: persona role plus task.
    pub fn query(&self) -> String {
        format!("{}. {}", self.persona.role, self.job_to_be_done.task)
    }
}

/// Metadata block of the collection output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub input_documents: Vec<String>,
    pub persona: String,
    pub job_to_be_done: String,
    pub processing_timestamp: String,
}

/// One globally ranked section in the output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedSection {
    pub document: String,
    pub section_title: String,
    pub importance_rank: u32,
    pub page_number: u32,
}

/// Refined text of one ranked section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsectionAnalysis {
    pub document: String,
    pub refined_text: String,
    pub page_number: u32,
}

/// Collection-mode output JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionOutput {
    pub metadata: Metadata,
    pub extracted_sections: Vec<ExtractedSection>,
    pub subsection_analysis: Vec<SubsectionAnalysis>,
}

impl CollectionOutput {
    /// Assemble the output from globally ranked sections.
    ///
    /// Sections must already carry a `final_rank`; unranked sections are
    /// skipped.
    pub fn from_ranked(
        config: &CollectionConfig,
        timestamp: impl Into<String>,
        sections: &[Section],
    ) -> Self {
        let ranked = sections.iter().filter(|s| s.final_rank.is_some());

        let extracted_sections = ranked
            .clone()
            .map(|s| ExtractedSection {
                document: s.document.clone(),
                section_title: s.title.clone(),
                importance_rank: s.final_rank.unwrap_or(0),
                page_number: s.page,
            })
            .collect();

        let subsection_analysis = ranked
            .map(|s| SubsectionAnalysis {
                document: s.document.clone(),
                refined_text: s.refined_text.clone(),
                page_number: s.page,
            })
            .collect();

        Self {
            metadata: Metadata {
                input_documents: config.documents.iter().map(|d| d.filename.clone()).collect(),
                persona: config.persona.role.clone(),
                job_to_be_done: config.job_to_be_done.task.clone(),
                processing_timestamp: timestamp.into(),
            },
            extracted_sections,
            subsection_analysis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HeadingLevel;

    fn test_config() -> CollectionConfig {
        CollectionConfig {
            challenge_info: ChallengeInfo {
                challenge_id: "round_1b_002".to_string(),
                test_case_name: None,
                description: None,
            },
            documents: vec![DocumentRef {
                filename: "guide.pdf".to_string(),
                title: None,
            }],
            persona: Persona {
                role: "Travel Planner".to_string(),
            },
            job_to_be_done: JobToBeDone {
                task: "Plan a trip of 4 days for a group of 10".to_string(),
            },
        }
    }

    #[test]
    fn test_query_combines_role_and_task() {
        let config = test_config();
        assert_eq!(
            config.query(),
            "Travel Planner. Plan a trip of 4 days for a group of 10"
        );
    }

    #[test]
    fn test_config_deserialization() {
        let json = r#"{
            "challenge_info": {"challenge_id": "round_1b_002"},
            "documents": [{"filename": "a.pdf"}, {"filename": "b.pdf"}],
            "persona": {"role": "Researcher"},
            "job_to_be_done": {"task": "Survey prior work"}
        }"#;
        let config: CollectionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.documents.len(), 2);
        assert_eq!(config.challenge_info.challenge_id, "round_1b_002");
    }

    #[test]
    fn test_from_ranked_skips_unranked() {
        let config = test_config();
        let mut ranked = Section::new("guide.pdf", "Cities", "text", 2, HeadingLevel::H1);
        ranked.raw_score = 0.9;
        ranked.final_rank = Some(1);
        let unranked = Section::new("guide.pdf", "Footer", "text", 9, HeadingLevel::H3);

        let output = CollectionOutput::from_ranked(&config, "2025-01-01T00:00:00", &[ranked, unranked]);
        assert_eq!(output.extracted_sections.len(), 1);
        assert_eq!(output.subsection_analysis.len(), 1);
        assert_eq!(output.extracted_sections[0].importance_rank, 1);
        assert_eq!(output.metadata.persona, "Travel Planner");
    }
}
