// src/carrinho/carrinho_structs.rs

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::produtos::produtos_structs::Produto;

/// Carrinho de um usuário. `convertido` indica que já virou um pedido.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Carrinho {
    pub id: i32,
    pub usuario_id: i32,
    pub convertido: bool,
    pub criado_em: DateTime<Utc>,
}

/// Linha do carrinho: um produto e a sua quantidade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ItemCarrinho {
    pub id: i32,
    pub carrinho_id: i32,
    pub produto_id: i32,
    pub quantidade: i32,
}

/// Linha do carrinho já unida aos dados do produto.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemComProduto {
    pub produto: Produto,
    pub quantidade: i32,
    pub foto_principal: Option<String>,
}

/// Corpo de `POST /carrinho/itens/{produto_id}`.
#[derive(Debug, Deserialize)]
pub struct AlterarQuantidadeRequest {
    pub delta: i32,
}

/// Estado de um produto no carrinho depois de uma consulta ou alteração.
/// `quantidade` nula indica que o produto não está no carrinho.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuantidadeResponse {
    pub produto_id: i32,
    pub quantidade: Option<i32>,
    pub total_carrinho: i64,
}

/// Conteúdo completo do carrinho ativo.
#[derive(Debug, Serialize, Deserialize)]
pub struct CarrinhoResponse {
    pub itens: Vec<ItemComProduto>,
    pub total_itens: i64,
    pub valor_total: BigDecimal,
}
