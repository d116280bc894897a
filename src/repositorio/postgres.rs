// src/repositorio/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{query, query_as, query_scalar, Pool, Postgres};

use super::{ErroRepositorio, Repositorio};
use crate::carrinho::carrinho_structs::{Carrinho, ItemCarrinho};
use crate::categorias::categoria_structs::Categoria;
use crate::favoritos::favoritos_structs::Favorito;
use crate::pedidos::pedidos_structs::{NovoPedido, Pedido, STATUS_NOVO};
use crate::produtos::produtos_structs::{FiltroProdutos, FotoProduto, Produto};
use crate::shared::shared_structs::Paginacao;
use crate::usuarios::usuario_structs::{DadosNovoUsuario, Sessao, TipoLogin, Usuario};
use crate::vendedores::vendedores_structs::Vendedor;

const COLUNAS_PRODUTO: &str = "id, nome, descricao, largura, comprimento, altura, preco, estoque, \
     categoria_id, subcategoria_id, material_id, cor_id, vendedor_id, na_pagina_principal, criado_em";

const COLUNAS_USUARIO: &str = "id, nome, email, telefone, senha_hash";

/// Repositório sobre um pool de conexões PostgreSQL.
#[derive(Clone)]
pub struct PgRepositorio {
    pool: Pool<Postgres>,
}

impl PgRepositorio {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Monta o padrão do ILIKE escapando os curingas digitados pelo usuário.
fn padrao_ilike(termo: &str) -> String {
    let mut escapado = String::with_capacity(termo.len() + 2);
    escapado.push('%');
    for c in termo.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escapado.push('\\');
        }
        escapado.push(c);
    }
    escapado.push('%');
    escapado
}

#[async_trait]
impl Repositorio for PgRepositorio {
    async fn listar_produtos(
        &self,
        filtro: &FiltroProdutos,
        paginacao: Paginacao,
    ) -> Result<Vec<Produto>, ErroRepositorio> {
        let sql = format!(
            "SELECT {COLUNAS_PRODUTO} FROM produtos \
             WHERE ($1::text IS NULL OR nome ILIKE $1) \
               AND ($2::int IS NULL OR categoria_id = $2 OR subcategoria_id = $2) \
               AND ($3::int IS NULL OR vendedor_id = $3) \
               AND (NOT $4 OR na_pagina_principal) \
             ORDER BY criado_em DESC, id DESC \
             OFFSET $5 LIMIT $6"
        );

        let produtos = query_as::<_, Produto>(&sql)
            .bind(filtro.termo.as_deref().map(padrao_ilike))
            .bind(filtro.categoria_id)
            .bind(filtro.vendedor_id)
            .bind(filtro.apenas_destaques)
            .bind(paginacao.offset)
            .bind(paginacao.limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(produtos)
    }

    async fn buscar_produto(&self, id: i32) -> Result<Option<Produto>, ErroRepositorio> {
        let sql = format!("SELECT {COLUNAS_PRODUTO} FROM produtos WHERE id = $1");
        let produto = query_as::<_, Produto>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(produto)
    }

    async fn buscar_produtos_por_ids(&self, ids: &[i32]) -> Result<Vec<Produto>, ErroRepositorio> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {COLUNAS_PRODUTO} FROM produtos WHERE id = ANY($1)");
        let produtos = query_as::<_, Produto>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(produtos)
    }

    async fn listar_fotos(&self, produto_id: i32) -> Result<Vec<FotoProduto>, ErroRepositorio> {
        let fotos = query_as::<_, FotoProduto>(
            "SELECT id, produto_id, url, principal, criado_em FROM produto_fotos \
             WHERE produto_id = $1 ORDER BY criado_em ASC, id ASC",
        )
        .bind(produto_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(fotos)
    }

    async fn listar_fotos_de_produtos(
        &self,
        produto_ids: &[i32],
    ) -> Result<Vec<FotoProduto>, ErroRepositorio> {
        if produto_ids.is_empty() {
            return Ok(Vec::new());
        }
        let fotos = query_as::<_, FotoProduto>(
            "SELECT id, produto_id, url, principal, criado_em FROM produto_fotos \
             WHERE produto_id = ANY($1) ORDER BY criado_em ASC, id ASC",
        )
        .bind(produto_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(fotos)
    }

    async fn buscar_nome_material(&self, id: i32) -> Result<Option<String>, ErroRepositorio> {
        let nome = query_scalar::<_, String>("SELECT nome FROM materiais WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(nome)
    }

    async fn buscar_nome_cor(&self, id: i32) -> Result<Option<String>, ErroRepositorio> {
        let nome = query_scalar::<_, String>("SELECT nome FROM cores WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(nome)
    }

    async fn listar_categorias(&self) -> Result<Vec<Categoria>, ErroRepositorio> {
        let categorias =
            query_as::<_, Categoria>("SELECT id, nome, parent_id FROM categorias ORDER BY nome, id")
                .fetch_all(&self.pool)
                .await?;
        Ok(categorias)
    }

    async fn buscar_categoria(&self, id: i32) -> Result<Option<Categoria>, ErroRepositorio> {
        let categoria =
            query_as::<_, Categoria>("SELECT id, nome, parent_id FROM categorias WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(categoria)
    }

    async fn buscar_vendedor(&self, id: i32) -> Result<Option<Vendedor>, ErroRepositorio> {
        let vendedor = query_as::<_, Vendedor>(
            "SELECT id, nome, descricao, logo_url FROM vendedores WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(vendedor)
    }

    async fn buscar_usuario_por_login(
        &self,
        tipo: TipoLogin,
        login: &str,
    ) -> Result<Option<Usuario>, ErroRepositorio> {
        // A coluna vem de um enum fechado, nunca da requisição
        let sql = format!(
            "SELECT {COLUNAS_USUARIO} FROM usuarios WHERE {} = $1",
            tipo.coluna()
        );
        let usuario = query_as::<_, Usuario>(&sql)
            .bind(login)
            .fetch_optional(&self.pool)
            .await?;
        Ok(usuario)
    }

    async fn buscar_usuario(&self, id: i32) -> Result<Option<Usuario>, ErroRepositorio> {
        let sql = format!("SELECT {COLUNAS_USUARIO} FROM usuarios WHERE id = $1");
        let usuario = query_as::<_, Usuario>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(usuario)
    }

    async fn criar_usuario(&self, dados: &DadosNovoUsuario) -> Result<Usuario, ErroRepositorio> {
        let sql = format!(
            "INSERT INTO usuarios (nome, email, telefone, senha_hash) VALUES ($1, $2, $3, $4) \
             RETURNING {COLUNAS_USUARIO}"
        );
        let usuario = query_as::<_, Usuario>(&sql)
            .bind(&dados.nome)
            .bind(&dados.email)
            .bind(&dados.telefone)
            .bind(&dados.senha_hash)
            .fetch_one(&self.pool)
            .await?;
        Ok(usuario)
    }

    async fn criar_sessao(
        &self,
        usuario_id: i32,
        expira_em: DateTime<Utc>,
    ) -> Result<Sessao, ErroRepositorio> {
        let sessao = query_as::<_, Sessao>(
            "INSERT INTO sessoes (usuario_id, expira_em) VALUES ($1, $2) \
             RETURNING id, usuario_id, criada_em, expira_em, revogada_em",
        )
        .bind(usuario_id)
        .bind(expira_em)
        .fetch_one(&self.pool)
        .await?;
        Ok(sessao)
    }

    async fn buscar_sessao(&self, id: i32) -> Result<Option<Sessao>, ErroRepositorio> {
        let sessao = query_as::<_, Sessao>(
            "SELECT id, usuario_id, criada_em, expira_em, revogada_em FROM sessoes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(sessao)
    }

    async fn revogar_sessao(&self, id: i32) -> Result<bool, ErroRepositorio> {
        let resultado = query(
            "UPDATE sessoes SET revogada_em = now() WHERE id = $1 AND revogada_em IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(resultado.rows_affected() > 0)
    }

    async fn listar_carrinhos(&self, usuario_id: i32) -> Result<Vec<Carrinho>, ErroRepositorio> {
        let carrinhos = query_as::<_, Carrinho>(
            "SELECT id, usuario_id, convertido, criado_em FROM carrinhos \
             WHERE usuario_id = $1 ORDER BY criado_em DESC, id DESC",
        )
        .bind(usuario_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(carrinhos)
    }

    async fn listar_carrinhos_com_pedido(&self, usuario_id: i32) -> Result<Vec<i32>, ErroRepositorio> {
        let ids = query_scalar::<_, i32>("SELECT carrinho_id FROM pedidos WHERE usuario_id = $1")
            .bind(usuario_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn criar_carrinho(&self, usuario_id: i32) -> Result<Carrinho, ErroRepositorio> {
        let carrinho = query_as::<_, Carrinho>(
            "INSERT INTO carrinhos (usuario_id) VALUES ($1) \
             RETURNING id, usuario_id, convertido, criado_em",
        )
        .bind(usuario_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(carrinho)
    }

    async fn listar_itens(&self, carrinho_ids: &[i32]) -> Result<Vec<ItemCarrinho>, ErroRepositorio> {
        if carrinho_ids.is_empty() {
            return Ok(Vec::new());
        }
        let itens = query_as::<_, ItemCarrinho>(
            "SELECT id, carrinho_id, produto_id, quantidade FROM itens_carrinho \
             WHERE carrinho_id = ANY($1) ORDER BY id",
        )
        .bind(carrinho_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(itens)
    }

    async fn contar_itens(&self, carrinho_id: i32) -> Result<i64, ErroRepositorio> {
        let total = query_scalar::<_, i64>("SELECT COUNT(*) FROM itens_carrinho WHERE carrinho_id = $1")
            .bind(carrinho_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn buscar_item(
        &self,
        carrinho_id: i32,
        produto_id: i32,
    ) -> Result<Option<ItemCarrinho>, ErroRepositorio> {
        let item = query_as::<_, ItemCarrinho>(
            "SELECT id, carrinho_id, produto_id, quantidade FROM itens_carrinho \
             WHERE carrinho_id = $1 AND produto_id = $2",
        )
        .bind(carrinho_id)
        .bind(produto_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn inserir_item(
        &self,
        carrinho_id: i32,
        produto_id: i32,
        quantidade: i32,
    ) -> Result<ItemCarrinho, ErroRepositorio> {
        let item = query_as::<_, ItemCarrinho>(
            "INSERT INTO itens_carrinho (carrinho_id, produto_id, quantidade) VALUES ($1, $2, $3) \
             RETURNING id, carrinho_id, produto_id, quantidade",
        )
        .bind(carrinho_id)
        .bind(produto_id)
        .bind(quantidade)
        .fetch_one(&self.pool)
        .await?;
        Ok(item)
    }

    async fn atualizar_quantidade(
        &self,
        item_id: i32,
        quantidade: i32,
    ) -> Result<ItemCarrinho, ErroRepositorio> {
        query_as::<_, ItemCarrinho>(
            "UPDATE itens_carrinho SET quantidade = $1 WHERE id = $2 \
             RETURNING id, carrinho_id, produto_id, quantidade",
        )
        .bind(quantidade)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ErroRepositorio::NaoEncontrado(format!("item de carrinho {item_id}")))
    }

    async fn remover_item(&self, item_id: i32) -> Result<u64, ErroRepositorio> {
        let resultado = query("DELETE FROM itens_carrinho WHERE id = $1")
            .bind(item_id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected())
    }

    async fn registrar_pedido(&self, pedido: &NovoPedido) -> Result<Pedido, ErroRepositorio> {
        // Tudo ou nada: se qualquer passo falhar, o rollback acontece no drop da transação
        let mut transaction = self.pool.begin().await?;

        // A linha do carrinho fica travada até o commit; uma finalização
        // concorrente do mesmo carrinho espera e depois não encontra nada
        let convertido = query("UPDATE carrinhos SET convertido = TRUE WHERE id = $1 AND NOT convertido")
            .bind(pedido.carrinho_id)
            .execute(&mut *transaction)
            .await?;
        if convertido.rows_affected() != 1 {
            return Err(ErroRepositorio::Conflito(format!(
                "carrinho {} já finalizado",
                pedido.carrinho_id
            )));
        }

        let criado = query_as::<_, Pedido>(
            "INSERT INTO pedidos (usuario_id, carrinho_id, status, total) VALUES ($1, $2, $3, $4) \
             RETURNING id, usuario_id, carrinho_id, status, total, criado_em, atualizado_em",
        )
        .bind(pedido.usuario_id)
        .bind(pedido.carrinho_id)
        .bind(STATUS_NOVO)
        .bind(&pedido.total)
        .fetch_one(&mut *transaction)
        .await?;

        for item in &pedido.itens {
            // Estoque nulo não é controlado e continua nulo
            query("UPDATE produtos SET estoque = GREATEST(estoque - $1, 0) WHERE id = $2 AND estoque IS NOT NULL")
                .bind(item.quantidade)
                .bind(item.produto_id)
                .execute(&mut *transaction)
                .await?;
        }

        query("INSERT INTO carrinhos (usuario_id) VALUES ($1)")
            .bind(pedido.usuario_id)
            .execute(&mut *transaction)
            .await?;

        transaction.commit().await?;

        Ok(criado)
    }

    async fn listar_pedidos(&self, usuario_id: i32) -> Result<Vec<Pedido>, ErroRepositorio> {
        let pedidos = query_as::<_, Pedido>(
            "SELECT id, usuario_id, carrinho_id, status, total, criado_em, atualizado_em FROM pedidos \
             WHERE usuario_id = $1 ORDER BY criado_em DESC, id DESC",
        )
        .bind(usuario_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(pedidos)
    }

    async fn buscar_favorito(
        &self,
        usuario_id: i32,
        produto_id: i32,
    ) -> Result<Option<Favorito>, ErroRepositorio> {
        let favorito = query_as::<_, Favorito>(
            "SELECT id, usuario_id, produto_id FROM favoritos WHERE usuario_id = $1 AND produto_id = $2",
        )
        .bind(usuario_id)
        .bind(produto_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(favorito)
    }

    async fn inserir_favorito(
        &self,
        usuario_id: i32,
        produto_id: i32,
    ) -> Result<Favorito, ErroRepositorio> {
        // O DO UPDATE vazio faz o RETURNING devolver a linha já existente
        let favorito = query_as::<_, Favorito>(
            "INSERT INTO favoritos (usuario_id, produto_id) VALUES ($1, $2) \
             ON CONFLICT (usuario_id, produto_id) DO UPDATE SET usuario_id = EXCLUDED.usuario_id \
             RETURNING id, usuario_id, produto_id",
        )
        .bind(usuario_id)
        .bind(produto_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(favorito)
    }

    async fn remover_favorito(&self, usuario_id: i32, produto_id: i32) -> Result<u64, ErroRepositorio> {
        let resultado = query("DELETE FROM favoritos WHERE usuario_id = $1 AND produto_id = $2")
            .bind(usuario_id)
            .bind(produto_id)
            .execute(&self.pool)
            .await?;
        Ok(resultado.rows_affected())
    }

    async fn listar_favoritos(&self, usuario_id: i32) -> Result<Vec<Favorito>, ErroRepositorio> {
        let favoritos = query_as::<_, Favorito>(
            "SELECT id, usuario_id, produto_id FROM favoritos WHERE usuario_id = $1 ORDER BY id DESC",
        )
        .bind(usuario_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(favoritos)
    }
}
