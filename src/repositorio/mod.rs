// src/repositorio/mod.rs

//! Acesso aos dados da loja.
//!
//! Toda leitura e escrita de tabela passa pelo trait [`Repositorio`]. Os
//! handlers e serviços recebem um `&dyn Repositorio` e nunca montam SQL.
//! Em produção a implementação é [`postgres::PgRepositorio`]; nos testes,
//! `memoria::MemRepositorio` guarda as linhas em memória.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use crate::carrinho::carrinho_structs::{Carrinho, ItemCarrinho};
use crate::categorias::categoria_structs::Categoria;
use crate::favoritos::favoritos_structs::Favorito;
use crate::pedidos::pedidos_structs::{NovoPedido, Pedido};
use crate::produtos::produtos_structs::{FiltroProdutos, FotoProduto, Produto};
use crate::shared::shared_structs::Paginacao;
use crate::usuarios::usuario_structs::{DadosNovoUsuario, Sessao, TipoLogin, Usuario};
use crate::vendedores::vendedores_structs::Vendedor;

#[cfg(test)]
pub mod memoria;
pub mod postgres;

/// Código SQLSTATE de violação de chave única.
const VIOLACAO_UNICIDADE: &str = "23505";

/// Erros do acesso a dados.
#[derive(Debug, Error)]
pub enum ErroRepositorio {
    #[error("erro de banco de dados: {0}")]
    Banco(#[source] sqlx::Error),

    #[error("registro não encontrado: {0}")]
    NaoEncontrado(String),

    /// A escrita colidiu com uma linha existente ou com o estado atual dela.
    #[error("conflito ao gravar: {0}")]
    Conflito(String),

    #[error("banco de dados indisponível: {0}")]
    Indisponivel(String),
}

impl From<sqlx::Error> for ErroRepositorio {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                ErroRepositorio::Indisponivel(e.to_string())
            }
            sqlx::Error::Database(ref db) if db.code().as_deref() == Some(VIOLACAO_UNICIDADE) => {
                ErroRepositorio::Conflito(db.message().to_string())
            }
            _ => ErroRepositorio::Banco(e),
        }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait Repositorio: Send + Sync {
    // --- Catálogo ---

    /// Produtos mais novos primeiro, filtrados e paginados.
    async fn listar_produtos(
        &self,
        filtro: &FiltroProdutos,
        paginacao: Paginacao,
    ) -> Result<Vec<Produto>, ErroRepositorio>;

    async fn buscar_produto(&self, id: i32) -> Result<Option<Produto>, ErroRepositorio>;

    async fn buscar_produtos_por_ids(&self, ids: &[i32]) -> Result<Vec<Produto>, ErroRepositorio>;

    /// Fotos de um produto, da mais antiga para a mais nova.
    async fn listar_fotos(&self, produto_id: i32) -> Result<Vec<FotoProduto>, ErroRepositorio>;

    async fn listar_fotos_de_produtos(
        &self,
        produto_ids: &[i32],
    ) -> Result<Vec<FotoProduto>, ErroRepositorio>;

    async fn buscar_nome_material(&self, id: i32) -> Result<Option<String>, ErroRepositorio>;

    async fn buscar_nome_cor(&self, id: i32) -> Result<Option<String>, ErroRepositorio>;

    /// Categorias em ordem alfabética.
    async fn listar_categorias(&self) -> Result<Vec<Categoria>, ErroRepositorio>;

    async fn buscar_categoria(&self, id: i32) -> Result<Option<Categoria>, ErroRepositorio>;

    async fn buscar_vendedor(&self, id: i32) -> Result<Option<Vendedor>, ErroRepositorio>;

    // --- Usuários e sessões ---

    async fn buscar_usuario_por_login(
        &self,
        tipo: TipoLogin,
        login: &str,
    ) -> Result<Option<Usuario>, ErroRepositorio>;

    async fn buscar_usuario(&self, id: i32) -> Result<Option<Usuario>, ErroRepositorio>;

    /// [`ErroRepositorio::Conflito`] se o e-mail ou telefone já estiver em uso.
    async fn criar_usuario(&self, dados: &DadosNovoUsuario) -> Result<Usuario, ErroRepositorio>;

    async fn criar_sessao(
        &self,
        usuario_id: i32,
        expira_em: DateTime<Utc>,
    ) -> Result<Sessao, ErroRepositorio>;

    async fn buscar_sessao(&self, id: i32) -> Result<Option<Sessao>, ErroRepositorio>;

    /// Marca a sessão como revogada. Retorna `false` se ela não existia ou já estava revogada.
    async fn revogar_sessao(&self, id: i32) -> Result<bool, ErroRepositorio>;

    // --- Carrinho ---

    /// Carrinhos do usuário, do mais novo para o mais antigo.
    async fn listar_carrinhos(&self, usuario_id: i32) -> Result<Vec<Carrinho>, ErroRepositorio>;

    /// IDs dos carrinhos que já aparecem em algum pedido do usuário.
    async fn listar_carrinhos_com_pedido(&self, usuario_id: i32) -> Result<Vec<i32>, ErroRepositorio>;

    async fn criar_carrinho(&self, usuario_id: i32) -> Result<Carrinho, ErroRepositorio>;

    async fn listar_itens(&self, carrinho_ids: &[i32]) -> Result<Vec<ItemCarrinho>, ErroRepositorio>;

    async fn contar_itens(&self, carrinho_id: i32) -> Result<i64, ErroRepositorio>;

    async fn buscar_item(
        &self,
        carrinho_id: i32,
        produto_id: i32,
    ) -> Result<Option<ItemCarrinho>, ErroRepositorio>;

    async fn inserir_item(
        &self,
        carrinho_id: i32,
        produto_id: i32,
        quantidade: i32,
    ) -> Result<ItemCarrinho, ErroRepositorio>;

    async fn atualizar_quantidade(
        &self,
        item_id: i32,
        quantidade: i32,
    ) -> Result<ItemCarrinho, ErroRepositorio>;

    async fn remover_item(&self, item_id: i32) -> Result<u64, ErroRepositorio>;

    // --- Pedidos ---

    /// Registra o pedido numa única transação: marca o carrinho como
    /// convertido, insere o pedido, baixa o estoque (nunca abaixo de zero) e
    /// cria um carrinho vazio para o usuário.
    ///
    /// Devolve [`ErroRepositorio::Conflito`] sem gravar nada se o carrinho já
    /// estava convertido ou não existe.
    async fn registrar_pedido(&self, pedido: &NovoPedido) -> Result<Pedido, ErroRepositorio>;

    /// Pedidos do usuário, do mais novo para o mais antigo.
    async fn listar_pedidos(&self, usuario_id: i32) -> Result<Vec<Pedido>, ErroRepositorio>;

    // --- Favoritos ---

    async fn buscar_favorito(
        &self,
        usuario_id: i32,
        produto_id: i32,
    ) -> Result<Option<Favorito>, ErroRepositorio>;

    /// Insere o par; se ele já existir devolve a linha existente.
    async fn inserir_favorito(
        &self,
        usuario_id: i32,
        produto_id: i32,
    ) -> Result<Favorito, ErroRepositorio>;

    async fn remover_favorito(&self, usuario_id: i32, produto_id: i32) -> Result<u64, ErroRepositorio>;

    async fn listar_favoritos(&self, usuario_id: i32) -> Result<Vec<Favorito>, ErroRepositorio>;
}
