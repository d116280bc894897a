// src/pedidos/pedidos_structs.rs

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::carrinho::carrinho_structs::{ItemCarrinho, ItemComProduto};

/// Status de todo pedido recém-criado.
pub const STATUS_NOVO: &str = "novo";

/// Pedido: fotografia de um carrinho no momento da finalização.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Pedido {
    pub id: i32,
    pub usuario_id: i32,
    pub carrinho_id: i32,
    pub status: String,
    pub total: BigDecimal,
    pub criado_em: DateTime<Utc>,
    pub atualizado_em: DateTime<Utc>,
}

/// Dados para registrar um pedido a partir de um carrinho.
/// `itens` são usados para baixar o estoque dos produtos.
#[derive(Debug, Clone, PartialEq)]
pub struct NovoPedido {
    pub usuario_id: i32,
    pub carrinho_id: i32,
    pub total: BigDecimal,
    pub itens: Vec<ItemCarrinho>,
}

/// Pedido com as linhas do carrinho que o originou.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PedidoComItens {
    #[serde(flatten)]
    pub pedido: Pedido,
    pub itens: Vec<ItemComProduto>,
}
