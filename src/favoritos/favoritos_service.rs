// src/favoritos/favoritos_service.rs

use std::collections::HashMap;

use thiserror::Error;

use crate::produtos::produtos_service;
use crate::produtos::produtos_structs::ProdutoResumo;
use crate::repositorio::{ErroRepositorio, Repositorio};

#[derive(Debug, Error)]
pub enum ErroFavorito {
    #[error("Produto com ID {0} não encontrado.")]
    ProdutoNaoEncontrado(i32),

    #[error(transparent)]
    Repositorio(#[from] ErroRepositorio),
}

/// Marca ou desmarca o produto como favorito. Devolve o novo estado.
pub async fn alternar_favorito(
    repo: &dyn Repositorio,
    usuario_id: i32,
    produto_id: i32,
) -> Result<bool, ErroFavorito> {
    if repo.buscar_favorito(usuario_id, produto_id).await?.is_some() {
        repo.remover_favorito(usuario_id, produto_id).await?;
        return Ok(false);
    }

    if repo.buscar_produto(produto_id).await?.is_none() {
        return Err(ErroFavorito::ProdutoNaoEncontrado(produto_id));
    }
    repo.inserir_favorito(usuario_id, produto_id).await?;
    Ok(true)
}

pub async fn eh_favorito(repo: &dyn Repositorio, usuario_id: i32, produto_id: i32) -> bool {
    match repo.buscar_favorito(usuario_id, produto_id).await {
        Ok(favorito) => favorito.is_some(),
        Err(e) => {
            tracing::warn!(error = %e, usuario_id, produto_id, "Erro ao consultar favorito");
            false
        }
    }
}

/// Produtos favoritos do usuário, do mais recente para o mais antigo.
pub async fn listar_favoritos(repo: &dyn Repositorio, usuario_id: i32) -> Vec<ProdutoResumo> {
    let favoritos = match repo.listar_favoritos(usuario_id).await {
        Ok(favoritos) => favoritos,
        Err(e) => {
            tracing::warn!(error = %e, usuario_id, "Erro ao listar favoritos");
            return Vec::new();
        }
    };
    if favoritos.is_empty() {
        return Vec::new();
    }

    let ids: Vec<i32> = favoritos.iter().map(|f| f.produto_id).collect();
    let mut por_id: HashMap<i32, _> = match repo.buscar_produtos_por_ids(&ids).await {
        Ok(produtos) => produtos.into_iter().map(|p| (p.id, p)).collect(),
        Err(e) => {
            tracing::warn!(error = %e, usuario_id, "Erro ao carregar produtos favoritos");
            return Vec::new();
        }
    };

    let produtos = ids.iter().filter_map(|id| por_id.remove(id)).collect();
    produtos_service::com_fotos_principais(repo, produtos).await
}
