//! Display strings for the supported languages.

use ratatui::layout::Alignment;
use serde::Deserialize;

use crate::data::{GenderSlice, SymptomFilter};

/// Display language for chart titles and legends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ja,
    Ar,
}

/// Strings for one language.
#[derive(Debug)]
pub struct Labels {
    pub language: &'static str,
    pub symptoms: &'static str,
    pub age_title: &'static str,
    pub gender_title: &'static str,
    pub distance_title: &'static str,
    pub sick: &'static str,
    pub not_sick: &'static str,
    pub distance_axis: &'static str,
    pub density_axis: &'static str,
    pub probability: &'static str,
    /// Names of the four gender slices, in [`GenderSlice::ALL`] order.
    pub gender: [&'static str; 4],
    /// Names of the symptom filters: `All`, then the known tags in cycle order.
    pub filters: [&'static str; 7],
}

const EN: Labels = Labels {
    language: "Language",
    symptoms: "Symptoms",
    age_title: "Age",
    gender_title: "Gender",
    distance_title: "Cough Statistics",
    sick: "Sick",
    not_sick: "Not sick",
    distance_axis: "Distance Metric",
    density_axis: "Probability Density",
    probability: "Probability",
    gender: ["Sick Male", "Non-Sick Male", "Sick Female", "Non-Sick Female"],
    filters: ["All", "Heavy Smoker", "Cold", "Influenza", "COVID", "SARS", "RSV"],
};

const JA: Labels = Labels {
    language: "言語",
    symptoms: "症状",
    age_title: "年齢",
    gender_title: "性別",
    distance_title: "咳の統計",
    sick: "病気",
    not_sick: "健康",
    distance_axis: "距離メトリック",
    density_axis: "確率密度",
    probability: "確率",
    gender: ["病気の男性", "健康な男性", "病気の女性", "健康な女性"],
    filters: ["すべて", "ヘビースモーカー", "風邪", "インフルエンザ", "COVID", "SARS", "RSV"],
};

const AR: Labels = Labels {
    language: "اللغة",
    symptoms: "الأعراض",
    age_title: "العمر",
    gender_title: "الجنس",
    distance_title: "إحصائيات السعال",
    sick: "مريض",
    not_sick: "غير مريض",
    distance_axis: "مقياس المسافة",
    density_axis: "كثافة الاحتمال",
    probability: "الاحتمال",
    gender: ["ذكر مريض", "ذكر غير مريض", "أنثى مريضة", "أنثى غير مريضة"],
    filters: [
        "الكل",
        "مدخن ثقيل",
        "برد",
        "إنفلونزا",
        "كوفيد",
        "سارس",
        "الفيروس المخلوي التنفسي",
    ],
};

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Ja, Language::Ar];

    pub fn labels(&self) -> &'static Labels {
        match self {
            Language::En => &EN,
            Language::Ja => &JA,
            Language::Ar => &AR,
        }
    }

    /// Short code shown in the header.
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ja => "ja",
            Language::Ar => "ar",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Language::En => Language::Ja,
            Language::Ja => Language::Ar,
            Language::Ar => Language::En,
        }
    }

    /// Whether text in this language reads right to left.
    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::Ar)
    }

    /// Alignment for legends and other free-standing text.
    pub fn alignment(&self) -> Alignment {
        if self.is_rtl() {
            Alignment::Right
        } else {
            Alignment::Left
        }
    }
}

impl Labels {
    pub fn gender_slice(&self, slice: GenderSlice) -> &'static str {
        let index = GenderSlice::ALL
            .iter()
            .position(|s| *s == slice)
            .unwrap_or_default();
        self.gender[index]
    }

    /// Display name for a filter. Tags without a translation are shown as-is.
    pub fn filter<'a>(&self, filter: &'a SymptomFilter) -> &'a str {
        match filter {
            SymptomFilter::All => self.filters[0],
            SymptomFilter::Tag(tag) => crate::data::heatmap::SYMPTOM_TAGS
                .iter()
                .position(|t| *t == tag.as_str())
                .map_or(tag.as_str(), |i| self.filters[i + 1]),
        }
    }
}
