// src/common/i18n.rs

use std::{collections::HashMap, sync::Arc};

pub const DEFAULT_LANG: &str = "en";

// Catálogos embutidos no binário
const CATALOGS: [(&str, &str); 2] = [
    ("en", include_str!("../../locales/en.json")),
    ("pt", include_str!("../../locales/pt.json")),
];

// Mensagens traduzidas por idioma -> chave
#[derive(Clone, Debug, Default)]
pub struct I18nStore {
    catalogs: Arc<HashMap<String, HashMap<String, String>>>,
}

impl I18nStore {
    pub fn load() -> anyhow::Result<Self> {
        let mut catalogs = HashMap::new();
        for (lang, raw) in CATALOGS {
            let messages: HashMap<String, String> = serde_json::from_str(raw)
                .map_err(|e| anyhow::anyhow!("Catálogo '{}' inválido: {}", lang, e))?;
            catalogs.insert(lang.to_string(), messages);
        }
        Ok(Self { catalogs: Arc::new(catalogs) })
    }

    pub fn languages(&self) -> Vec<&str> {
        self.catalogs.keys().map(String::as_str).collect()
    }

    /// Traduz `key` para `lang`, caindo para o inglês e depois para a própria chave.
    /// Os argumentos substituem `{nome}` na mensagem.
    pub fn translate(&self, lang: &str, key: &str, args: &[(&str, &str)]) -> String {
        let template = self
            .catalogs
            .get(lang)
            .and_then(|messages| messages.get(key))
            .or_else(|| self.catalogs.get(DEFAULT_LANG).and_then(|messages| messages.get(key)))
            .cloned()
            .unwrap_or_else(|| key.to_string());

        args.iter().fold(template, |message, (name, value)| {
            message.replace(&format!("{{{}}}", name), value)
        })
    }
}
