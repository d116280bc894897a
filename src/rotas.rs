// src/rotas.rs

use actix_web::web;

use crate::shared::erros::ApiError;
use crate::{carrinho, categorias, favoritos, pedidos, produtos, usuarios, vendedores};

/// Registra todas as rotas da API.
///
/// Rotas fixas vêm antes das rotas com `{id}` do mesmo prefixo
/// (ex.: `/produtos/destaques` antes de `/produtos/{id}`).
pub fn configurar(cfg: &mut web::ServiceConfig) {
    cfg
        // JSON ou query string malformados respondem no formato GenericResponse
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            ApiError::RequisicaoInvalida(format!("Corpo da requisição inválido: {}", err)).into()
        }))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| {
            ApiError::RequisicaoInvalida(format!("Parâmetros inválidos: {}", err)).into()
        }))

        // Módulo de Produtos
        .service(produtos::produtos_router::buscar_produtos)
        .service(produtos::produtos_router::buscar_destaques)
        .service(produtos::produtos_router::pesquisar_produtos)
        .service(produtos::produtos_router::buscar_produto_por_id)

        // Módulo de Categorias
        .service(categorias::categoria_router::buscar_categorias)
        .service(categorias::categoria_router::buscar_arvore_categorias)
        .service(categorias::categoria_router::buscar_categoria_por_id)

        // Módulo de Vendedores
        .service(vendedores::vendedores_router::buscar_vendedor)
        .service(vendedores::vendedores_router::buscar_produtos_do_vendedor)

        // Módulo de Usuários
        .service(usuarios::usuario_router::cadastrar_usuario)
        .service(usuarios::usuario_router::login_usuario)
        .service(usuarios::usuario_router::logout_usuario)
        .service(usuarios::usuario_router::perfil_usuario)

        // Módulo de Carrinho
        .service(carrinho::carrinho_router::ver_carrinho)
        .service(carrinho::carrinho_router::total_do_carrinho)
        .service(carrinho::carrinho_router::quantidade_no_carrinho)
        .service(carrinho::carrinho_router::alterar_item)

        // Módulo de Pedidos
        .service(pedidos::pedidos_router::finalizar_pedido)
        .service(pedidos::pedidos_router::listar_pedidos)

        // Módulo de Favoritos
        .service(favoritos::favoritos_router::listar_favoritos)
        .service(favoritos::favoritos_router::consultar_favorito)
        .service(favoritos::favoritos_router::alternar_favorito);
}
