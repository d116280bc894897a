// src/carrinho/carrinho_service.rs

//! Regras do carrinho.
//!
//! O carrinho ativo de um usuário é escolhido por uma única política
//! ([`resolver_carrinho_ativo`]): entre os carrinhos do usuário, descarta os
//! que já viraram pedido (pela marca `convertido` e também pela tabela de
//! pedidos) e prefere um que já tenha itens. Um carrinho convertido nunca é
//! reaproveitado para novas compras.

use std::collections::{HashMap, HashSet};

use bigdecimal::BigDecimal;
use thiserror::Error;

use super::carrinho_structs::{ItemCarrinho, ItemComProduto};
use crate::produtos::produtos_service;
use crate::produtos::produtos_structs::Produto;
use crate::repositorio::{ErroRepositorio, Repositorio};

#[derive(Debug, Error)]
pub enum ErroCarrinho {
    #[error("Não foi possível criar o carrinho.")]
    CriacaoFalhou(#[source] ErroRepositorio),

    #[error("Produto com ID {0} não encontrado.")]
    ProdutoNaoEncontrado(i32),

    #[error("Não é possível adicionar mais do que o estoque ({estoque} un.).")]
    EstoqueInsuficiente { estoque: i32 },

    #[error("Não foi possível alterar o carrinho.")]
    Repositorio(#[from] ErroRepositorio),
}

/// Escolhe o carrinho ativo do usuário e, se `criar` for verdadeiro e não
/// houver candidato, cria um novo.
///
/// Falhas de leitura não interrompem a escolha: sem a lista de carrinhos o
/// resultado é "sem carrinho" (ou a criação de um, se pedida); sem a lista de
/// pedidos ou de itens o passo correspondente é pulado. Só a falha ao criar
/// o carrinho é devolvida como erro.
pub async fn resolver_carrinho_ativo(
    repo: &dyn Repositorio,
    usuario_id: i32,
    criar: bool,
) -> Result<Option<i32>, ErroCarrinho> {
    let carrinhos = match repo.listar_carrinhos(usuario_id).await {
        Ok(carrinhos) => carrinhos,
        Err(e) => {
            tracing::warn!(error = %e, usuario_id, "Erro ao listar carrinhos");
            if !criar {
                return Ok(None);
            }
            Vec::new()
        }
    };

    let com_pedido: HashSet<i32> = match repo.listar_carrinhos_com_pedido(usuario_id).await {
        Ok(ids) => ids.into_iter().collect(),
        Err(e) => {
            tracing::warn!(error = %e, usuario_id, "Erro ao listar carrinhos com pedido");
            HashSet::new()
        }
    };

    let candidatos: Vec<i32> = carrinhos
        .iter()
        .filter(|c| !c.convertido && !com_pedido.contains(&c.id))
        .map(|c| c.id)
        .collect();

    if let Some(&primeiro) = candidatos.first() {
        let escolhido = match repo.listar_itens(&candidatos).await {
            Ok(itens) => {
                let totais = quantidades_por_carrinho(&itens);
                candidatos
                    .iter()
                    .copied()
                    .find(|id| totais.get(id).copied().unwrap_or(0) > 0)
                    .unwrap_or(primeiro)
            }
            Err(e) => {
                tracing::warn!(error = %e, usuario_id, "Erro ao listar itens dos carrinhos");
                primeiro
            }
        };
        return Ok(Some(escolhido));
    }

    if !criar {
        return Ok(None);
    }

    let novo = repo
        .criar_carrinho(usuario_id)
        .await
        .map_err(ErroCarrinho::CriacaoFalhou)?;
    tracing::info!(usuario_id, carrinho_id = novo.id, "Carrinho criado");

    Ok(Some(novo.id))
}

fn quantidades_por_carrinho(itens: &[ItemCarrinho]) -> HashMap<i32, i64> {
    let mut totais = HashMap::new();
    for item in itens {
        *totais.entry(item.carrinho_id).or_insert(0) += i64::from(item.quantidade);
    }
    totais
}

/// Soma `delta` à quantidade do produto no carrinho ativo (criado se faltar).
///
/// Devolve a nova quantidade, ou `None` quando o produto não está (ou deixou
/// de estar) no carrinho. Não confere estoque.
pub async fn alterar_quantidade(
    repo: &dyn Repositorio,
    usuario_id: i32,
    produto_id: i32,
    delta: i32,
) -> Result<Option<i32>, ErroCarrinho> {
    let carrinho_id = resolver_carrinho_ativo(repo, usuario_id, true)
        .await?
        .ok_or_else(|| ErroCarrinho::CriacaoFalhou(ErroRepositorio::NaoEncontrado("carrinho ativo".into())))?;

    let Some(item) = repo.buscar_item(carrinho_id, produto_id).await? else {
        if delta <= 0 {
            return Ok(None);
        }
        if repo.buscar_produto(produto_id).await?.is_none() {
            return Err(ErroCarrinho::ProdutoNaoEncontrado(produto_id));
        }
        let inserido = repo.inserir_item(carrinho_id, produto_id, delta).await?;
        return Ok(Some(inserido.quantidade));
    };

    let nova_quantidade = item.quantidade.saturating_add(delta);
    if nova_quantidade <= 0 {
        repo.remover_item(item.id).await?;
        return Ok(None);
    }

    let atualizado = repo.atualizar_quantidade(item.id, nova_quantidade).await?;
    Ok(Some(atualizado.quantidade))
}

/// Conferência de estoque feita antes de aumentar a quantidade: a quantidade
/// resultante não pode passar do estoque.
///
/// É apenas consultiva: outra sessão pode alterar o carrinho ou o estoque
/// entre esta conferência e a alteração.
pub fn conferir_estoque(estoque: Option<i32>, quantidade_atual: i32, delta: i32) -> Result<(), ErroCarrinho> {
    match estoque {
        Some(estoque) if delta > 0 && quantidade_atual.saturating_add(delta) > estoque => {
            Err(ErroCarrinho::EstoqueInsuficiente { estoque })
        }
        _ => Ok(()),
    }
}

/// Soma das quantidades do carrinho ativo. Zero se não houver carrinho ou se a leitura falhar.
pub async fn total_itens(repo: &dyn Repositorio, usuario_id: i32) -> i64 {
    let Ok(Some(carrinho_id)) = resolver_carrinho_ativo(repo, usuario_id, false).await else {
        return 0;
    };

    match repo.listar_itens(&[carrinho_id]).await {
        Ok(itens) => itens.iter().map(|i| i64::from(i.quantidade)).sum(),
        Err(e) => {
            tracing::warn!(error = %e, usuario_id, "Erro ao somar itens do carrinho");
            0
        }
    }
}

/// Quantidade de um produto no carrinho ativo, ou `None` se não estiver lá.
pub async fn quantidade_do_produto(repo: &dyn Repositorio, usuario_id: i32, produto_id: i32) -> Option<i32> {
    let carrinho_id = resolver_carrinho_ativo(repo, usuario_id, false).await.ok()??;

    match repo.buscar_item(carrinho_id, produto_id).await {
        Ok(item) => item.map(|i| i.quantidade),
        Err(e) => {
            tracing::warn!(error = %e, usuario_id, produto_id, "Erro ao buscar item do carrinho");
            None
        }
    }
}

/// Itens do carrinho ativo com os dados dos produtos.
/// Itens cujo produto não existe mais são ignorados.
pub async fn itens_com_produtos(repo: &dyn Repositorio, usuario_id: i32) -> Vec<ItemComProduto> {
    let Ok(Some(carrinho_id)) = resolver_carrinho_ativo(repo, usuario_id, false).await else {
        return Vec::new();
    };

    match repo.listar_itens(&[carrinho_id]).await {
        Ok(itens) => juntar_produtos(repo, itens).await,
        Err(e) => {
            tracing::warn!(error = %e, usuario_id, "Erro ao carregar itens do carrinho");
            Vec::new()
        }
    }
}

/// Une linhas de carrinho aos produtos e às fotos principais.
/// Se os produtos não puderem ser lidos o resultado é vazio.
pub async fn juntar_produtos(repo: &dyn Repositorio, itens: Vec<ItemCarrinho>) -> Vec<ItemComProduto> {
    match ProdutosDosItens::carregar(repo, &itens).await {
        Some(produtos) => produtos.juntar(itens),
        None => Vec::new(),
    }
}

/// Produtos e fotos principais referenciados por um lote de linhas de carrinho.
pub struct ProdutosDosItens {
    produtos: HashMap<i32, Produto>,
    fotos: HashMap<i32, String>,
}

impl ProdutosDosItens {
    /// Lê os produtos das linhas e as fotos principais deles, uma consulta
    /// para cada. `None` se os produtos não puderem ser lidos.
    pub async fn carregar(repo: &dyn Repositorio, itens: &[ItemCarrinho]) -> Option<Self> {
        let mut ids: Vec<i32> = itens.iter().map(|i| i.produto_id).collect();
        ids.sort_unstable();
        ids.dedup();

        if ids.is_empty() {
            return Some(Self {
                produtos: HashMap::new(),
                fotos: HashMap::new(),
            });
        }

        let produtos = match repo.buscar_produtos_por_ids(&ids).await {
            Ok(produtos) => produtos,
            Err(e) => {
                tracing::warn!(error = %e, "Erro ao carregar produtos dos itens");
                return None;
            }
        };
        let fotos = produtos_service::fotos_principais(repo, &ids).await;

        Some(Self {
            produtos: produtos.into_iter().map(|p| (p.id, p)).collect(),
            fotos,
        })
    }

    /// Linhas cujo produto não existe mais são ignoradas.
    pub fn juntar(&self, itens: Vec<ItemCarrinho>) -> Vec<ItemComProduto> {
        itens
            .into_iter()
            .filter_map(|item| {
                let produto = self.produtos.get(&item.produto_id)?.clone();
                Some(ItemComProduto {
                    foto_principal: self.fotos.get(&produto.id).cloned(),
                    produto,
                    quantidade: item.quantidade,
                })
            })
            .collect()
    }
}

/// Valor dos itens pelos preços atuais dos produtos.
pub fn valor_total(itens: &[ItemComProduto]) -> BigDecimal {
    let mut total = BigDecimal::from(0);
    for item in itens {
        total += &item.produto.preco * &BigDecimal::from(item.quantidade);
    }
    total
}
