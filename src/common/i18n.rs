// src/common/i18n.rs

use std::{collections::HashMap, sync::LazyLock};

pub const DEFAULT_LOCALE: &str = "pt";

static GLOBAL_STORE: LazyLock<I18nStore> = LazyLock::new(I18nStore::embedded);

/// Catálogo de mensagens por idioma, embutido no binário.
#[derive(Debug, Default)]
pub struct I18nStore {
    messages: HashMap<String, HashMap<String, String>>,
}

impl I18nStore {
    pub fn global() -> &'static I18nStore {
        &GLOBAL_STORE
    }

    fn embedded() -> Self {
        let mut store = Self::default();
        for (lang, raw) in [
            ("pt", include_str!("../../locales/pt.json")),
            ("en", include_str!("../../locales/en.json")),
        ] {
            match serde_json::from_str::<HashMap<String, String>>(raw) {
                Ok(catalog) => {
                    store.messages.insert(lang.to_string(), catalog);
                }
                Err(e) => tracing::error!("Catálogo de idioma '{}' inválido: {}", lang, e),
            }
        }
        store
    }

    /// Traduz a chave; cai para o idioma padrão e, em último caso, devolve a própria chave.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.messages
            .get(lang)
            .and_then(|catalog| catalog.get(key))
            .or_else(|| {
                self.messages
                    .get(DEFAULT_LOCALE)
                    .and_then(|catalog| catalog.get(key))
            })
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    pub fn translate_with(&self, lang: &str, key: &str, args: &[(&str, &str)]) -> String {
        args.iter()
            .fold(self.translate(lang, key), |message, (name, value)| {
                message.replace(&format!("{{{}}}", name), value)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_language_falls_back_to_portuguese() {
        let store = I18nStore::global();
        assert_eq!(store.translate("de", "nao_encontrado"), "Recurso não encontrado.");
        assert_eq!(store.translate("en", "nao_encontrado"), "Resource not found.");
    }

    #[test]
    fn unknown_key_is_returned_verbatim() {
        assert_eq!(I18nStore::global().translate("pt", "mensagem livre"), "mensagem livre");
    }

    #[test]
    fn placeholders_are_replaced() {
        let message = I18nStore::global().translate_with(
            "pt",
            "notificacao_submissao",
            &[("status", "APROVADO")],
        );
        assert_eq!(message, "Sua submissão foi avaliada: APROVADO.");
    }
}
