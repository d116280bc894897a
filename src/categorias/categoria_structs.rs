// src/categorias/categoria_structs.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estrutura que representa uma categoria no banco de dados.
/// `parent_id` nulo indica uma categoria raiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Categoria {
    pub id: i32,
    pub nome: String,
    pub parent_id: Option<i32>,
}

/// Categoria raiz com as suas subcategorias, usada pelo filtro da busca.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoriaComFilhas {
    #[serde(flatten)]
    pub categoria: Categoria,
    pub subcategorias: Vec<Categoria>,
}
