// src/favoritos/favoritos_structs.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Par (usuário, produto) marcado como favorito.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Favorito {
    pub id: i32,
    pub usuario_id: i32,
    pub produto_id: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EstadoFavorito {
    pub produto_id: i32,
    pub favorito: bool,
}
