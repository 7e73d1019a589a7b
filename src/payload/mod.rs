// src/payload/mod.rs

//! Montagem do payload enviado ao webhook de produção.
//!
//! O documento bruto do anúncio vira uma lista de campos editáveis
//! ([`DraftField`]), cada um com a sua flag de inclusão, mais uma seleção
//! ordenada de fotos. O payload de saída é recalculado a cada alteração.
//! Todas as operações de [`DraftPayload`] devolvem uma cópia nova; o rascunho
//! original nunca é alterado.

pub mod draft;
pub mod edits;
pub mod images;
pub mod labels;
pub mod shape;

pub use draft::{parse_payload_text, DraftField, DraftPayload};
pub use edits::DraftEdit;
pub use images::{ImageSelection, MoveDirection};
pub use shape::FieldShape;

use thiserror::Error;

/// Chaves de controle que nunca aparecem no editor.
pub const RESERVED_KEYS: [&str; 7] = [
    "id",
    "client_id",
    "source_url",
    "selected_images",
    "webhook_payload",
    "created_at",
    "updated_at",
];

pub const IMAGE_LIST_KEY: &str = "carousel_images";
pub const IMAGE_OUTPUT_KEY: &str = "images";
pub const DEFAULT_SELECTION_CAP: usize = 12;
pub const LONG_TEXT_THRESHOLD: usize = 120;

#[derive(Debug, Clone)]
pub struct BuilderConfig {
    /// Chave do documento que guarda a lista de URLs das fotos.
    pub image_list_key: String,
    /// Chave usada no payload para a seleção de fotos.
    pub image_output_key: String,
    pub reserved_keys: Vec<String>,
    /// Quantas fotos entram na seleção inicial quando não há seleção salva.
    pub selection_cap: usize,
    /// Strings acima deste tamanho (em caracteres) usam o editor multilinha.
    pub long_text_threshold: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            image_list_key: IMAGE_LIST_KEY.to_string(),
            image_output_key: IMAGE_OUTPUT_KEY.to_string(),
            reserved_keys: RESERVED_KEYS.iter().map(|k| k.to_string()).collect(),
            selection_cap: DEFAULT_SELECTION_CAP,
            long_text_threshold: LONG_TEXT_THRESHOLD,
        }
    }
}

impl BuilderConfig {
    pub fn is_reserved(&self, key: &str) -> bool {
        self.reserved_keys.iter().any(|k| k == key)
    }
}

#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("Campo desconhecido: '{0}'")]
    UnknownField(String),

    #[error("O campo '{key}' ({shape:?}) não aceita esta edição")]
    WrongShape { key: String, shape: FieldShape },

    #[error("Índice {index} fora do intervalo para '{key}' (tamanho {len})")]
    IndexOutOfRange { key: String, index: usize, len: usize },

    #[error("Valor '{text}' inválido para o campo '{key}'")]
    InvalidScalar { key: String, text: String },

    #[error("JSON inválido: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("O payload precisa ser um objeto JSON")]
    NotAnObject,
}
