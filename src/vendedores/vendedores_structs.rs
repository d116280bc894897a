// src/vendedores/vendedores_structs.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Perfil público de um vendedor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Vendedor {
    pub id: i32,
    pub nome: String,
    pub descricao: Option<String>,
    pub logo_url: Option<String>,
}
