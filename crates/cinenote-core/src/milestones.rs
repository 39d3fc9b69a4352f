//! Data-driven rank ladder.
//!
//! Ranks are rows of a table rather than enum variants so a locale or a new
//! tier is added by data alone. Tables are validated once at construction:
//! non-empty, strictly ascending thresholds, first threshold 0.

use crate::error::MilestoneError;
use cinenote_models::Language;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Milestone {
    /// Review count needed to hold this rank
    pub threshold: u32,
    /// Stable tag, e.g. "popcorn_addict"
    pub role: String,
    /// Display name, e.g. "Popcorn Addict"
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MilestoneTable {
    milestones: Vec<Milestone>,
}

#[derive(Debug, Deserialize)]
struct MilestoneFile {
    milestones: Vec<Milestone>,
}

// (threshold, role, title, english description, indonesian description)
const BUILTIN: [(u32, &str, &str, &str, &str); 11] = [
    (0, "newbie", "Newbie",
        "One film logged. The start of your cinematic journey.",
        "Satu film tercatat. Selamat datang di dunia sinema!"),
    (25, "casual_viewer", "Casual Viewer",
        "Watching for entertainment. A healthy, normal phase.",
        "Nonton buat hiburan doang. Fase yang sehat."),
    (50, "popcorn_addict", "Popcorn Addict",
        "The local cinema staff is starting to recognize you.",
        "Staf bioskop mulai hafal wajahmu."),
    (75, "weekend_binger", "Weekend Binger",
        "Canceling social plans to finish your watchlist.",
        "Mulai sering nolak ajakan main demi namatin watchlist."),
    (100, "letterboxd_user", "Letterboxd User",
        "Everything is logged. Even bad movies count for the stats.",
        "Hanya catat (tanpa ulasan). Demi data statistik."),
    (125, "a24_disciple", "A24 Disciple",
        "Starting to argue that 4:3 aspect ratio is superior aesthetics.",
        "Mulai sadar kalau rasio 4:3 itu estetik."),
    (150, "criterion_collector", "Criterion Collector",
        "Savings drained for limited edition Blu-ray collections.",
        "Gaji habis buat beli Blu-ray edisi terbatas."),
    (175, "film_student", "Film Student",
        "Analyzing color grading instead of enjoying the plot.",
        "Lebih sibuk analisis 'color grading' daripada nikmatin cerita."),
    (200, "indie_snob", "Indie Snob",
        "Refusing to watch anything under 90% on Rotten Tomatoes.",
        "Anti banget nonton film yang skornya di bawah 90%."),
    (225, "festival_juror", "Festival Juror",
        "You have very specific opinions about Cannes winners.",
        "Punya opini super spesifik soal pemenang festival Cannes."),
    (250, "cinema_god", "Cinema God",
        "Martin Scorsese might text you for recommendations.",
        "Martin Scorsese mungkin bakal minta rekomendasi film ke kamu."),
];

impl MilestoneTable {
    pub fn new(milestones: Vec<Milestone>) -> Result<Self, MilestoneError> {
        let first = milestones.first().ok_or(MilestoneError::Empty)?;
        if first.threshold != 0 {
            return Err(MilestoneError::MissingBaseline(first.threshold));
        }
        for pair in milestones.windows(2) {
            if pair[1].threshold <= pair[0].threshold {
                return Err(MilestoneError::NotAscending {
                    previous: pair[0].threshold,
                    next: pair[1].threshold,
                });
            }
        }
        Ok(Self { milestones })
    }

    /// Eleven tiers from 0 to 250 reviews, descriptions in the given language
    pub fn builtin(language: Language) -> Self {
        let milestones = BUILTIN
            .iter()
            .map(|(threshold, role, title, en, id)| Milestone {
                threshold: *threshold,
                role: role.to_string(),
                title: title.to_string(),
                description: match language {
                    Language::En => en.to_string(),
                    Language::Id => id.to_string(),
                },
            })
            .collect();
        Self { milestones }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, MilestoneError> {
        let file: MilestoneFile = toml::from_str(content)?;
        Self::new(file.milestones)
    }

    pub fn load(path: &Path) -> Result<Self, MilestoneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    pub fn len(&self) -> usize {
        self.milestones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.milestones.is_empty()
    }

    /// Index of the highest milestone whose threshold does not exceed `count`
    pub fn active_index(&self, count: u32) -> usize {
        // Thresholds are ascending and the first is 0, so the partition point is >= 1
        self.milestones
            .partition_point(|m| m.threshold <= count)
            .saturating_sub(1)
    }

    pub fn is_top(&self, index: usize) -> bool {
        index + 1 == self.milestones.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn milestone(threshold: u32, role: &str) -> Milestone {
        Milestone {
            threshold,
            role: role.to_string(),
            title: role.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_builtin_tables_are_valid() {
        for language in [Language::En, Language::Id] {
            let table = MilestoneTable::builtin(language);
            let rebuilt = MilestoneTable::new(table.milestones().to_vec()).unwrap();
            assert_eq!(rebuilt.len(), 11);
            assert_eq!(rebuilt.milestones()[10].title, "Cinema God");
        }
    }

    #[test]
    fn test_builtin_descriptions_follow_language() {
        let en = MilestoneTable::builtin(Language::En);
        let id = MilestoneTable::builtin(Language::Id);
        assert_eq!(en.milestones()[2].role, id.milestones()[2].role);
        assert_ne!(en.milestones()[2].description, id.milestones()[2].description);
    }

    #[test]
    fn test_rejects_invalid_tables() {
        assert!(matches!(MilestoneTable::new(vec![]), Err(MilestoneError::Empty)));
        assert!(matches!(
            MilestoneTable::new(vec![milestone(5, "a")]),
            Err(MilestoneError::MissingBaseline(5))
        ));
        assert!(matches!(
            MilestoneTable::new(vec![milestone(0, "a"), milestone(10, "b"), milestone(10, "c")]),
            Err(MilestoneError::NotAscending { previous: 10, next: 10 })
        ));
    }

    #[test]
    fn test_active_index() {
        let table = MilestoneTable::builtin(Language::En);
        assert_eq!(table.active_index(0), 0);
        assert_eq!(table.active_index(24), 0);
        assert_eq!(table.active_index(25), 1);
        assert_eq!(table.active_index(249), 9);
        assert_eq!(table.active_index(250), 10);
        assert_eq!(table.active_index(10_000), 10);
        assert!(table.is_top(10));
    }

    #[test]
    fn test_from_toml() {
        let content = r#"
            [[milestones]]
            threshold = 0
            role = "rookie"
            title = "Rookie"
            description = "Just started"

            [[milestones]]
            threshold = 3
            role = "regular"
            title = "Regular"
            description = "Three films in"
        "#;
        let table = MilestoneTable::from_toml_str(content).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.active_index(3), 1);
    }
}
