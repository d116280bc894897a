// src/produtos/produtos_structs.rs

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estrutura que representa um produto no banco de dados
/// Deriva FromRow para mapeamento direto de resultados de query SQL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Produto {
    pub id: i32,
    pub nome: String,
    pub descricao: Option<String>,
    // Dimensões em centímetros, quando cadastradas
    pub largura: Option<i32>,
    pub comprimento: Option<i32>,
    pub altura: Option<i32>,
    pub preco: BigDecimal,
    /// Estoque disponível. `None` significa que o estoque não é controlado.
    pub estoque: Option<i32>,
    pub categoria_id: Option<i32>,
    pub subcategoria_id: Option<i32>,
    pub material_id: Option<i32>,
    pub cor_id: Option<i32>,
    pub vendedor_id: Option<i32>,
    pub na_pagina_principal: bool,
    pub criado_em: DateTime<Utc>,
}

/// Foto de um produto. Um produto pode ter várias; uma delas pode ser a principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FotoProduto {
    pub id: i32,
    pub produto_id: i32,
    pub url: String,
    pub principal: bool,
    pub criado_em: DateTime<Utc>,
}

/// Filtros aceitos pela listagem de produtos do repositório.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FiltroProdutos {
    /// Trecho do nome (sem diferenciar maiúsculas)
    pub termo: Option<String>,
    /// Casa com `categoria_id` ou `subcategoria_id`
    pub categoria_id: Option<i32>,
    pub vendedor_id: Option<i32>,
    pub apenas_destaques: bool,
}

/// Produto acompanhado da URL da foto principal, usado nas listagens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProdutoResumo {
    #[serde(flatten)]
    pub produto: Produto,
    pub foto_principal: Option<String>,
}

/// Nomes legíveis das referências do produto.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaProduto {
    pub material: Option<String>,
    pub cor: Option<String>,
    pub categoria: Option<String>,
    pub subcategoria: Option<String>,
}

/// Resposta da página de detalhe de um produto.
#[derive(Debug, Serialize, Deserialize)]
pub struct DetalheProduto {
    pub produto: Produto,
    pub fotos: Vec<FotoProduto>,
    pub meta: MetaProduto,
}

/// Parâmetros de `GET /produtos/busca`.
#[derive(Debug, Default, Deserialize)]
pub struct BuscaQuery {
    pub termo: Option<String>,
    pub categoria_id: Option<i32>,
    #[serde(default)]
    pub pagina: u32,
}

/// Parâmetros de `GET /produtos/destaques`.
#[derive(Debug, Default, Deserialize)]
pub struct DestaquesQuery {
    pub limite: Option<i64>,
}
