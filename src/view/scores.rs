//! Score card view models

use crate::model::ScoreBreakdown;
use crate::model::analysis::MAX_CRITERION_SCORE;

/// Colour band for a criterion score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Favorable,
    Neutral,
    Unfavorable,
}

impl ScoreBand {
    pub fn for_score(score: u8) -> Self {
        match score {
            4.. => ScoreBand::Favorable,
            3 => ScoreBand::Neutral,
            _ => ScoreBand::Unfavorable,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ScoreBand::Favorable => "band-favorable",
            ScoreBand::Neutral => "band-neutral",
            ScoreBand::Unfavorable => "band-unfavorable",
        }
    }
}

/// One row of the score card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreItemView {
    pub label: &'static str,
    pub description: &'static str,
    pub score: u8,
    pub band: ScoreBand,
    /// Indicator bar width, 0-100
    pub bar_percent: u32,
}

impl ScoreItemView {
    pub fn new(label: &'static str, description: &'static str, score: u8) -> Self {
        let score = score.min(MAX_CRITERION_SCORE);
        Self {
            label,
            description,
            score,
            band: ScoreBand::for_score(score),
            bar_percent: bar_percent(score),
        }
    }
}

/// Proportional bar width for a score clamped to 0-5
pub fn bar_percent(score: u8) -> u32 {
    u32::from(score.min(MAX_CRITERION_SCORE)) * 100 / u32::from(MAX_CRITERION_SCORE)
}

/// Rows for the four criteria, in card order
pub fn score_items(scores: &ScoreBreakdown) -> Vec<ScoreItemView> {
    vec![
        ScoreItemView::new("Content", "Relevance to the task", scores.content),
        ScoreItemView::new(
            "Comm. Achievement",
            "Style & Register",
            scores.communicative_achievement,
        ),
        ScoreItemView::new("Organization", "Paragraphs & Linking", scores.organization),
        ScoreItemView::new("Language", "Grammar & Vocabulary", scores.language),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_thresholds() {
        assert_eq!(ScoreBand::for_score(5), ScoreBand::Favorable);
        assert_eq!(ScoreBand::for_score(4), ScoreBand::Favorable);
        assert_eq!(ScoreBand::for_score(3), ScoreBand::Neutral);
        assert_eq!(ScoreBand::for_score(2), ScoreBand::Unfavorable);
        assert_eq!(ScoreBand::for_score(0), ScoreBand::Unfavorable);
    }

    #[test]
    fn test_bar_width_is_proportional_and_clamped() {
        assert_eq!(bar_percent(0), 0);
        assert_eq!(bar_percent(3), 60);
        assert_eq!(bar_percent(5), 100);
        assert_eq!(bar_percent(9), 100);
        assert_eq!(ScoreItemView::new("x", "y", 7).score, 5);
    }

    #[test]
    fn test_items_follow_card_order() {
        let items = score_items(&ScoreBreakdown {
            content: 4,
            communicative_achievement: 3,
            organization: 2,
            language: 1,
        });

        let labels: Vec<_> = items.iter().map(|i| i.label).collect();
        assert_eq!(
            labels,
            vec!["Content", "Comm. Achievement", "Organization", "Language"]
        );
        assert_eq!(items[1].band, ScoreBand::Neutral);
        assert_eq!(items[3].bar_percent, 20);
    }
}
