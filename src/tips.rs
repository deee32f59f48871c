//! Tips module - short coaching tips shown next to the plan

use rand::seq::SliceRandom;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TipCategory {
    Motivation,
    Nutrition,
    Training,
    Hydration,
    Recovery,
}

impl TipCategory {
    pub fn emoji(&self) -> &'static str {
        match self {
            TipCategory::Motivation => "💪",
            TipCategory::Nutrition => "🥗",
            TipCategory::Training => "🏋️",
            TipCategory::Hydration => "💧",
            TipCategory::Recovery => "😴",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TipCategory::Motivation => "Motivation",
            TipCategory::Nutrition => "Nutrition",
            TipCategory::Training => "Training",
            TipCategory::Hydration => "Hydration",
            TipCategory::Recovery => "Recovery",
        }
    }

    pub fn all() -> &'static [TipCategory] {
        &[
            TipCategory::Motivation,
            TipCategory::Nutrition,
            TipCategory::Training,
            TipCategory::Hydration,
            TipCategory::Recovery,
        ]
    }
}

pub struct Tip {
    pub category: TipCategory,
    pub text: &'static str,
}

pub const TIPS: &[Tip] = &[
    // === MOTIVATION ===
    Tip {
        category: TipCategory::Motivation,
        text: "Every journey begins with a single step. Build consistent habits rather than chasing perfection.",
    },
    Tip {
        category: TipCategory::Motivation,
        text: "Complete today's workout to stay on track for your 45kg weight loss goal!",
    },
    Tip {
        category: TipCategory::Motivation,
        text: "Focus on maintaining consistency. Small daily wins add up to a big transformation.",
    },

    // === NUTRITION ===
    Tip {
        category: TipCategory::Nutrition,
        text: "Eat slowly and mindfully. It takes 20 minutes for your brain to register fullness!",
    },
    Tip {
        category: TipCategory::Nutrition,
        text: "Use Sunday to meal prep for the week. Healthy options at hand make the plan easy to follow.",
    },
    Tip {
        category: TipCategory::Nutrition,
        text: "Stick to the planned meal times. Regular meals keep your energy level stable through the day.",
    },

    // === TRAINING ===
    Tip {
        category: TipCategory::Training,
        text: "Add 5 minutes of stretching after each workout. Flexibility prevents injuries and improves recovery!",
    },
    Tip {
        category: TipCategory::Training,
        text: "Focus on proper form over heavy weights. Quality movements build lasting strength.",
    },
    Tip {
        category: TipCategory::Training,
        text: "Ready for more? Add 2-3 reps to each exercise or shorten the rest between sets.",
    },

    // === HYDRATION ===
    Tip {
        category: TipCategory::Hydration,
        text: "Start your day with 500ml of water before breakfast.",
    },
    Tip {
        category: TipCategory::Hydration,
        text: "Drink water throughout the day - aim for 4L total, split into four 1L blocks.",
    },
    Tip {
        category: TipCategory::Hydration,
        text: "Thirst often feels like hunger. Drink a glass of water before reaching for a snack.",
    },

    // === RECOVERY ===
    Tip {
        category: TipCategory::Recovery,
        text: "Quality sleep is when your body repairs and builds muscle. Aim for 7-9 hours nightly.",
    },
    Tip {
        category: TipCategory::Recovery,
        text: "Poor sleep can slow weight loss by 30%! Be in bed by 10:00 PM.",
    },
    Tip {
        category: TipCategory::Recovery,
        text: "Put screens away 30 minutes before bed and keep the bedroom cool and dark.",
    },
];

pub fn get_random_tip() -> &'static Tip {
    TIPS.choose(&mut rand::thread_rng()).unwrap_or(&TIPS[0])
}

pub fn get_random_tip_by_category(category: TipCategory) -> Option<&'static Tip> {
    let filtered: Vec<_> = TIPS.iter().filter(|t| t.category == category).collect();
    filtered.choose(&mut rand::thread_rng()).copied()
}

pub fn format_tip(tip: &Tip) -> String {
    format!("{} {}\n\n{}", tip.category.emoji(), tip.category.name(), tip.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tip_category_names() {
        assert_eq!(TipCategory::Motivation.name(), "Motivation");
        assert_eq!(TipCategory::Hydration.name(), "Hydration");
        assert_eq!(TipCategory::Recovery.name(), "Recovery");
    }

    #[test]
    fn test_tips_count() {
        assert_eq!(TIPS.len(), 15);
    }

    #[test]
    fn test_get_random_tip_never_panics() {
        for _ in 0..100 {
            let tip = get_random_tip();
            assert!(!tip.text.is_empty());
        }
    }

    #[test]
    fn test_get_random_tip_by_category_returns_correct_category() {
        for category in TipCategory::all() {
            let tip = get_random_tip_by_category(*category);
            assert!(tip.is_some(), "Category {:?} should have tips", category);
            assert_eq!(tip.unwrap().category, *category);
        }
    }

    #[test]
    fn test_format_tip() {
        let tip = &TIPS[0];
        let formatted = format_tip(tip);
        assert!(formatted.contains(tip.category.emoji()));
        assert!(formatted.contains(tip.category.name()));
        assert!(formatted.contains(tip.text));
    }

    #[test]
    fn test_tips_distribution_by_category() {
        let mut counts = std::collections::HashMap::new();
        for tip in TIPS.iter() {
            *counts.entry(tip.category).or_insert(0) += 1;
        }

        for category in TipCategory::all() {
            assert_eq!(counts.get(category), Some(&3), "{:?} should have 3 tips", category);
        }
    }
}
