// src/produtos/produtos_service.rs

//! Consultas do catálogo.
//!
//! As listagens seguem a regra do catálogo: em caso de erro no banco o
//! cliente recebe uma lista vazia e a falha fica registrada no log.

use std::collections::HashMap;

use super::produtos_structs::{DetalheProduto, FiltroProdutos, FotoProduto, MetaProduto, Produto, ProdutoResumo};
use crate::repositorio::{ErroRepositorio, Repositorio};
use crate::shared::shared_structs::Paginacao;

/// Quantidade padrão de produtos em destaque na página principal.
pub const LIMITE_DESTAQUES: i64 = 15;
const LIMITE_DESTAQUES_MAXIMO: i64 = 100;

/// Página `pagina` de todo o catálogo, mais novos primeiro.
pub async fn pagina_produtos(repo: &dyn Repositorio, pagina: u32) -> Vec<ProdutoResumo> {
    listar(repo, &FiltroProdutos::default(), Paginacao::pagina(pagina)).await
}

/// Produtos marcados para a página principal.
pub async fn produtos_em_destaque(repo: &dyn Repositorio, limite: Option<i64>) -> Vec<ProdutoResumo> {
    let limite = limite
        .unwrap_or(LIMITE_DESTAQUES)
        .clamp(1, LIMITE_DESTAQUES_MAXIMO);
    let filtro = FiltroProdutos {
        apenas_destaques: true,
        ..Default::default()
    };
    listar(repo, &filtro, Paginacao::primeiros(limite)).await
}

/// Busca por trecho do nome e/ou categoria. Termo em branco é ignorado.
pub async fn buscar_produtos(
    repo: &dyn Repositorio,
    termo: Option<&str>,
    categoria_id: Option<i32>,
    pagina: u32,
) -> Vec<ProdutoResumo> {
    let termo = termo
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);
    let filtro = FiltroProdutos {
        termo,
        categoria_id,
        ..Default::default()
    };
    listar(repo, &filtro, Paginacao::pagina(pagina)).await
}

pub async fn produtos_do_vendedor(
    repo: &dyn Repositorio,
    vendedor_id: i32,
    pagina: u32,
) -> Vec<ProdutoResumo> {
    let filtro = FiltroProdutos {
        vendedor_id: Some(vendedor_id),
        ..Default::default()
    };
    listar(repo, &filtro, Paginacao::pagina(pagina)).await
}

async fn listar(repo: &dyn Repositorio, filtro: &FiltroProdutos, paginacao: Paginacao) -> Vec<ProdutoResumo> {
    match repo.listar_produtos(filtro, paginacao).await {
        Ok(produtos) => com_fotos_principais(repo, produtos).await,
        Err(e) => {
            tracing::warn!(error = %e, ?filtro, "Erro ao listar produtos");
            Vec::new()
        }
    }
}

/// Anexa a cada produto a URL da sua foto principal.
pub async fn com_fotos_principais(repo: &dyn Repositorio, produtos: Vec<Produto>) -> Vec<ProdutoResumo> {
    let ids: Vec<i32> = produtos.iter().map(|p| p.id).collect();
    let mut fotos = fotos_principais(repo, &ids).await;

    produtos
        .into_iter()
        .map(|produto| ProdutoResumo {
            foto_principal: fotos.remove(&produto.id),
            produto,
        })
        .collect()
}

/// Mapa produto → URL da foto principal. Vazio se a consulta falhar.
pub async fn fotos_principais(repo: &dyn Repositorio, produto_ids: &[i32]) -> HashMap<i32, String> {
    if produto_ids.is_empty() {
        return HashMap::new();
    }
    match repo.listar_fotos_de_produtos(produto_ids).await {
        Ok(fotos) => escolher_fotos_principais(&fotos),
        Err(e) => {
            tracing::warn!(error = %e, "Erro ao carregar fotos dos produtos");
            HashMap::new()
        }
    }
}

/// A foto marcada como principal vence; sem ela fica a primeira recebida.
pub fn escolher_fotos_principais(fotos: &[FotoProduto]) -> HashMap<i32, String> {
    let mut mapa = HashMap::new();
    for foto in fotos {
        if foto.principal || !mapa.contains_key(&foto.produto_id) {
            mapa.insert(foto.produto_id, foto.url.clone());
        }
    }
    mapa
}

/// Produto com fotos e nomes das referências. `None` se o id não existe.
pub async fn detalhe_produto(repo: &dyn Repositorio, id: i32) -> Result<Option<DetalheProduto>, ErroRepositorio> {
    let Some(produto) = repo.buscar_produto(id).await? else {
        return Ok(None);
    };

    let fotos = repo.listar_fotos(id).await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, produto_id = id, "Erro ao carregar fotos do produto");
        Vec::new()
    });

    let meta = meta_produto(repo, &produto).await;

    Ok(Some(DetalheProduto { produto, fotos, meta }))
}

/// Nomes de material, cor, categoria e subcategoria. Cada busca que falhar fica vazia.
pub async fn meta_produto(repo: &dyn Repositorio, produto: &Produto) -> MetaProduto {
    let mut meta = MetaProduto::default();

    if let Some(id) = produto.material_id {
        meta.material = ou_vazio(repo.buscar_nome_material(id).await, "material");
    }
    if let Some(id) = produto.cor_id {
        meta.cor = ou_vazio(repo.buscar_nome_cor(id).await, "cor");
    }
    if let Some(id) = produto.categoria_id {
        meta.categoria = ou_vazio(repo.buscar_categoria(id).await, "categoria").map(|c| c.nome);
    }
    if let Some(id) = produto.subcategoria_id {
        meta.subcategoria = ou_vazio(repo.buscar_categoria(id).await, "subcategoria").map(|c| c.nome);
    }

    meta
}

fn ou_vazio<T>(resultado: Result<Option<T>, ErroRepositorio>, campo: &str) -> Option<T> {
    resultado.unwrap_or_else(|e| {
        tracing::warn!(error = %e, campo, "Erro ao carregar referência do produto");
        None
    })
}
