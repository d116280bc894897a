// src/pedidos/pedidos_service.rs

use std::collections::HashMap;

use bigdecimal::BigDecimal;
use thiserror::Error;

use super::pedidos_structs::{NovoPedido, Pedido, PedidoComItens};
use crate::carrinho::carrinho_service::{self, ProdutosDosItens};
use crate::carrinho::carrinho_structs::ItemCarrinho;
use crate::repositorio::{ErroRepositorio, Repositorio};

#[derive(Debug, Error)]
pub enum ErroPedido {
    #[error("Carrinho não encontrado.")]
    CarrinhoNaoEncontrado,

    #[error("Não foi possível verificar o carrinho.")]
    VerificacaoFalhou(#[source] ErroRepositorio),

    #[error("O carrinho está vazio. Adicione itens antes de finalizar o pedido.")]
    CarrinhoVazio,

    #[error("Não foi possível obter os itens do carrinho.")]
    ComposicaoIndisponivel(#[source] ErroRepositorio),

    #[error("Não foi possível obter os preços dos produtos.")]
    PrecosIndisponiveis(#[source] ErroRepositorio),

    #[error("Este carrinho já foi finalizado.")]
    CarrinhoJaFinalizado,

    #[error("Não foi possível criar o pedido.")]
    CriacaoFalhou(#[source] ErroRepositorio),
}

/// Finaliza o carrinho ativo do usuário como um pedido.
///
/// O total usa os preços atuais dos produtos, não os preços do momento em que
/// os itens entraram no carrinho. Nenhum pedido é gravado se o carrinho estiver
/// vazio. A gravação (pedido, marca no carrinho, baixa de estoque e novo
/// carrinho) é atômica, e um carrinho só pode ser finalizado uma vez.
pub async fn criar_pedido(repo: &dyn Repositorio, usuario_id: i32) -> Result<Pedido, ErroPedido> {
    // 1. Carrinho ativo, sem criar um novo
    let carrinho_id = carrinho_service::resolver_carrinho_ativo(repo, usuario_id, false)
        .await
        .ok()
        .flatten()
        .ok_or(ErroPedido::CarrinhoNaoEncontrado)?;

    // 2. O carrinho precisa ter itens
    let quantidade_linhas = repo
        .contar_itens(carrinho_id)
        .await
        .map_err(ErroPedido::VerificacaoFalhou)?;
    if quantidade_linhas <= 0 {
        return Err(ErroPedido::CarrinhoVazio);
    }

    // 3. Total pelos preços atuais
    let itens = repo
        .listar_itens(&[carrinho_id])
        .await
        .map_err(ErroPedido::ComposicaoIndisponivel)?;
    if itens.is_empty() {
        return Err(ErroPedido::CarrinhoVazio);
    }

    let ids: Vec<i32> = itens.iter().map(|i| i.produto_id).collect();
    let precos: HashMap<i32, BigDecimal> = repo
        .buscar_produtos_por_ids(&ids)
        .await
        .map_err(ErroPedido::PrecosIndisponiveis)?
        .into_iter()
        .map(|p| (p.id, p.preco))
        .collect();

    let total = calcular_total(&itens, &precos);

    // 4 a 7. Pedido, carrinho convertido, estoque e carrinho novo, numa transação
    let novo = NovoPedido {
        usuario_id,
        carrinho_id,
        total,
        itens,
    };
    let pedido = repo.registrar_pedido(&novo).await.map_err(|e| match e {
        // Outra requisição finalizou o mesmo carrinho primeiro
        ErroRepositorio::Conflito(_) => {
            tracing::warn!(usuario_id, carrinho_id, "Carrinho finalizado em paralelo");
            ErroPedido::CarrinhoJaFinalizado
        }
        e => {
            tracing::error!(error = %e, usuario_id, carrinho_id, "Erro ao registrar pedido");
            ErroPedido::CriacaoFalhou(e)
        }
    })?;

    tracing::info!(
        usuario_id,
        carrinho_id,
        pedido_id = pedido.id,
        total = %pedido.total,
        "Pedido criado"
    );

    Ok(pedido)
}

/// Σ(quantidade × preço). Produto sem preço conhecido conta como zero.
pub fn calcular_total(itens: &[ItemCarrinho], precos: &HashMap<i32, BigDecimal>) -> BigDecimal {
    let zero = BigDecimal::from(0);
    let mut total = BigDecimal::from(0);
    for item in itens {
        let preco = precos.get(&item.produto_id).unwrap_or(&zero);
        total += preco * &BigDecimal::from(item.quantidade);
    }
    total
}

/// Pedidos do usuário (mais novos primeiro), cada um com os itens do seu carrinho.
///
/// Falha ao ler pedidos ou itens devolve lista vazia; falha ao ler os
/// produtos devolve os pedidos sem itens.
pub async fn listar_pedidos(repo: &dyn Repositorio, usuario_id: i32) -> Vec<PedidoComItens> {
    let pedidos = match repo.listar_pedidos(usuario_id).await {
        Ok(pedidos) => pedidos,
        Err(e) => {
            tracing::warn!(error = %e, usuario_id, "Erro ao listar pedidos");
            return Vec::new();
        }
    };
    if pedidos.is_empty() {
        return Vec::new();
    }

    let mut carrinho_ids: Vec<i32> = pedidos.iter().map(|p| p.carrinho_id).collect();
    carrinho_ids.sort_unstable();
    carrinho_ids.dedup();

    let itens = match repo.listar_itens(&carrinho_ids).await {
        Ok(itens) => itens,
        Err(e) => {
            tracing::warn!(error = %e, usuario_id, "Erro ao carregar itens dos pedidos");
            return Vec::new();
        }
    };

    // Produtos e fotos de todos os pedidos de uma vez
    let produtos = ProdutosDosItens::carregar(repo, &itens).await;

    let mut por_carrinho: HashMap<i32, Vec<ItemCarrinho>> = HashMap::new();
    for item in itens {
        por_carrinho.entry(item.carrinho_id).or_default().push(item);
    }

    pedidos
        .into_iter()
        .map(|pedido| {
            let itens = match (&produtos, por_carrinho.get(&pedido.carrinho_id)) {
                (Some(produtos), Some(linhas)) => produtos.juntar(linhas.clone()),
                _ => Vec::new(),
            };
            PedidoComItens { pedido, itens }
        })
        .collect()
}
