use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct TextItem<'a> {
    pub text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TranslateItem {
    #[serde(default)]
    pub translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
pub struct Translation {
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectItem {
    pub language: Option<String>,
    pub score: Option<f64>,
    pub is_translation_supported: Option<bool>,
}
