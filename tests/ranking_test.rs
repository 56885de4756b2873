//! Integration tests for the scoring and collection-ranking flow, driven
//! by a stub neural backend.

use outrank::model::{
    ChallengeInfo, CollectionConfig, CollectionOutput, DocumentRef, JobToBeDone, Persona,
};
use outrank::rank::{rank_collection, RankerOptions};
use outrank::{HeadingLevel, RankOptions, RelevanceScorer, Result, Section, SectionScorer};

/// Stub scorer: logit proportional to query-term overlap, strongly
/// positive for matches and strongly negative otherwise.
struct OverlapScorer;

impl SectionScorer for OverlapScorer {
    fn score_pairs(&self, query: &str, texts: &[&str]) -> Result<Vec<f32>> {
        let query = query.to_lowercase();
        let terms: Vec<&str> = query
            .split_whitespace()
            .filter(|t| t.len() >= 4)
            .collect();
        Ok(texts
            .iter()
            .map(|t| {
                let lower = t.to_lowercase();
                let words: Vec<&str> = lower.split_whitespace().collect();
                let hits = terms.iter().filter(|&&term| words.contains(&term)).count();
                if hits > 0 {
                    hits as f32 * 4.0
                } else {
                    -4.0
                }
            })
            .collect())
    }
}

fn config() -> CollectionConfig {
    CollectionConfig {
        challenge_info: ChallengeInfo {
            challenge_id: "round_1b_002".to_string(),
            test_case_name: None,
            description: None,
        },
        documents: vec![
            DocumentRef {
                filename: "cities.pdf".to_string(),
                title: None,
            },
            DocumentRef {
                filename: "recipes.pdf".to_string(),
                title: None,
            },
        ],
        persona: Persona {
            role: "Travel Planner".to_string(),
        },
        job_to_be_done: JobToBeDone {
            task: "Plan a trip of 4 days for a group of 10 college friends".to_string(),
        },
    }
}

fn section(document: &str, title: &str, text: &str, page: u32) -> Section {
    Section::new(document, title, text, page, HeadingLevel::H2)
}

fn padded(topic: &str) -> String {
    format!(
        "{} {}",
        topic,
        std::iter::repeat("filler").take(80).collect::<Vec<_>>().join(" ")
    )
}

#[test]
fn relevant_sections_outrank_irrelevant_across_documents() {
    let cfg = config();
    let query = cfg.query();
    let stub = OverlapScorer;
    let scorer = RelevanceScorer::new(&stub, RankOptions::default());

    let cities_texts = vec![
        padded("plan your trip around the coastal cities and book a group hotel"),
        padded("the municipal water treatment system was renovated in 1987"),
    ];
    let recipes_texts = vec![padded("a hearty dinner recipe for feeding a large group")];

    let mut sections = vec![
        section("cities.pdf", "Trip Planning", &cities_texts[0], 2),
        section("cities.pdf", "Infrastructure", &cities_texts[1], 7),
        section("recipes.pdf", "Group Dinners", &recipes_texts[0], 3),
    ];

    // Score each document independently, as the pipeline does.
    let cities_refs: Vec<&str> = cities_texts.iter().map(|s| s.as_str()).collect();
    let scores = scorer.score_document(&query, &cities_refs);
    sections[0].raw_score = scores[0];
    sections[1].raw_score = scores[1];

    let recipes_refs: Vec<&str> = recipes_texts.iter().map(|s| s.as_str()).collect();
    let scores = scorer.score_document(&query, &recipes_refs);
    sections[2].raw_score = scores[0];

    let ranked = rank_collection(sections, &RankerOptions::default());

    // The planning section wins; the infrastructure section stays unranked.
    assert_eq!(ranked[0].title, "Trip Planning");
    assert_eq!(ranked[0].final_rank, Some(1));

    let infra = ranked.iter().find(|s| s.title == "Infrastructure").unwrap();
    assert_eq!(infra.final_rank, None);

    // Ranks are dense starting at one.
    let ranks: Vec<u32> = ranked.iter().filter_map(|s| s.final_rank).collect();
    let expected: Vec<u32> = (1..=ranks.len() as u32).collect();
    assert_eq!(ranks, expected);
}

#[test]
fn output_json_has_challenge_shape() {
    let cfg = config();
    let mut top = section("cities.pdf", "Trip Planning", "refined text here", 2);
    top.raw_score = 1.0;
    top.final_rank = Some(1);
    let unranked = section("recipes.pdf", "Appendix", "leftover text", 12);

    let output =
        CollectionOutput::from_ranked(&cfg, "2025-07-10T15:31:22+00:00", &[top, unranked]);
    let json = serde_json::to_value(&output).unwrap();

    assert_eq!(
        json["metadata"]["input_documents"],
        serde_json::json!(["cities.pdf", "recipes.pdf"])
    );
    assert_eq!(json["metadata"]["persona"], "Travel Planner");

    let extracted = json["extracted_sections"].as_array().unwrap();
    assert_eq!(extracted.len(), 1);
    assert_eq!(extracted[0]["document"], "cities.pdf");
    assert_eq!(extracted[0]["section_title"], "Trip Planning");
    assert_eq!(extracted[0]["importance_rank"], 1);
    assert_eq!(extracted[0]["page_number"], 2);

    let analysis = json["subsection_analysis"].as_array().unwrap();
    assert_eq!(analysis.len(), 1);
    assert_eq!(analysis[0]["refined_text"], "refined text here");
}

#[test]
fn scoring_keeps_one_score_per_section() {
    let stub = OverlapScorer;
    let scorer = RelevanceScorer::new(&stub, RankOptions::default());

    for count in [0usize, 1, 5, 80] {
        let texts: Vec<String> = (0..count).map(|i| padded(&format!("topic {}", i))).collect();
        let refs: Vec<&str> = texts.iter().map(|s| s.as_str()).collect();
        let scores = scorer.score_document("anything at all", &refs);
        assert_eq!(scores.len(), count);
        assert!(scores.iter().all(|s| (0.0..=1.0).contains(s)));
    }
}
