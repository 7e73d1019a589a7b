// src/payload/images.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Fotos escolhidas para o vídeo, na ordem em que serão enviadas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageSelection(Vec<String>);

impl ImageSelection {
    pub fn new(urls: Vec<String>) -> Self {
        Self(urls)
    }

    /// Seleção salva, se houver; senão as primeiras `cap` fotos do anúncio.
    pub fn initial(saved: Option<&[String]>, available: &[String], cap: usize) -> Self {
        match saved {
            Some(saved) => Self(saved.to_vec()),
            None => Self(available.iter().take(cap).cloned().collect()),
        }
    }

    /// Remove a URL se já estiver selecionada; senão adiciona no fim.
    /// Remover e marcar de novo manda a foto para o fim da lista.
    pub fn toggle(&self, url: &str) -> Self {
        if self.contains(url) {
            Self(self.0.iter().filter(|u| *u != url).cloned().collect())
        } else {
            let mut next = self.0.clone();
            next.push(url.to_string());
            Self(next)
        }
    }

    /// Troca a foto de lugar com a vizinha. Nas pontas, ou para uma URL fora
    /// da seleção, não faz nada.
    pub fn move_entry(&self, url: &str, direction: MoveDirection) -> Self {
        let Some(i) = self.0.iter().position(|u| u == url) else {
            return self.clone();
        };
        let j = match direction {
            MoveDirection::Up if i > 0 => i - 1,
            MoveDirection::Down if i + 1 < self.0.len() => i + 1,
            _ => return self.clone(),
        };
        let mut next = self.0.clone();
        next.swap(i, j);
        Self(next)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.0.iter().any(|u| u == url)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}
