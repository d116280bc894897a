// src/categorias/categoria_router.rs

use std::collections::HashMap;

use actix_web::{get, web, HttpResponse, Responder};

// Importa as structs de categoria
use super::categoria_structs::{Categoria, CategoriaComFilhas};
use crate::shared::erros::ApiError;
use crate::shared::shared_structs::GenericResponse;
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

/// Rota para buscar todas as categorias, em ordem alfabética.
#[get("/categorias")]
pub async fn buscar_categorias(data: web::Data<AppState>) -> impl Responder {
    let categorias = listar_ou_vazio(&data).await;

    HttpResponse::Ok().json(GenericResponse::sucesso("Categorias listadas com sucesso!", categorias))
}

/// Rota para buscar as categorias raiz, cada uma com as suas subcategorias.
#[get("/categorias/arvore")]
pub async fn buscar_arvore_categorias(data: web::Data<AppState>) -> impl Responder {
    let arvore = montar_arvore(listar_ou_vazio(&data).await);

    HttpResponse::Ok().json(GenericResponse::sucesso("Árvore de categorias.", arvore))
}

/// Rota para buscar uma categoria por ID.
#[get("/categorias/{id}")]
pub async fn buscar_categoria_por_id(
    data: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    match data.repositorio.buscar_categoria(id).await? {
        Some(categoria) => Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
            format!("Categoria com ID {} encontrada.", id),
            categoria,
        ))),
        None => Err(ApiError::NaoEncontrado(format!("Categoria com ID {} não encontrada.", id))),
    }
}

async fn listar_ou_vazio(data: &AppState) -> Vec<Categoria> {
    data.repositorio.listar_categorias().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Erro ao buscar categorias");
        Vec::new()
    })
}

/// Agrupa as categorias em raízes e subcategorias, mantendo a ordem recebida.
/// Subcategorias cujo pai não existe são descartadas.
pub fn montar_arvore(categorias: Vec<Categoria>) -> Vec<CategoriaComFilhas> {
    let (raizes, filhas): (Vec<Categoria>, Vec<Categoria>) =
        categorias.into_iter().partition(|c| c.parent_id.is_none());

    let mut por_pai: HashMap<i32, Vec<Categoria>> = HashMap::new();
    for filha in filhas {
        if let Some(pai) = filha.parent_id {
            por_pai.entry(pai).or_default().push(filha);
        }
    }

    raizes
        .into_iter()
        .map(|categoria| CategoriaComFilhas {
            subcategorias: por_pai.remove(&categoria.id).unwrap_or_default(),
            categoria,
        })
        .collect()
}
