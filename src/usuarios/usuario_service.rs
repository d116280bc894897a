// src/usuarios/usuario_service.rs

//! Contas e sessões.
//!
//! O login grava uma linha em `sessoes` e emite um JWT que carrega o id dessa
//! sessão (`sid`). Um token só vale enquanto a sessão estiver ativa, então o
//! logout invalida o token mesmo antes de ele expirar.

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use super::usuario_structs::{Claims, DadosNovoUsuario, LoginRequest, NovoUsuario, Sessao, TipoLogin, Usuario};
use crate::repositorio::{ErroRepositorio, Repositorio};

/// Tamanho mínimo da senha no cadastro.
pub const TAMANHO_MINIMO_SENHA: usize = 6;

// Custo mínimo do bcrypt nos testes para não deixá-los lentos.
#[cfg(not(test))]
const CUSTO_HASH: u32 = bcrypt::DEFAULT_COST;
#[cfg(test)]
const CUSTO_HASH: u32 = 4;

#[derive(Debug, Error)]
pub enum ErroAutenticacao {
    #[error("Já existe um usuário com este login.")]
    UsuarioJaExiste,

    #[error("Credenciais inválidas.")]
    CredenciaisInvalidas,

    #[error("Sessão inválida ou expirada. Faça login novamente.")]
    SessaoInvalida,

    #[error("{0}")]
    DadosInvalidos(String),

    #[error("erro ao processar senha: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("erro ao processar token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Repositorio(#[from] ErroRepositorio),
}

/// Resultado de um login bem-sucedido.
#[derive(Debug)]
pub struct SessaoIniciada {
    pub usuario: Usuario,
    pub sessao: Sessao,
    pub token: String,
}

/// Cadastra um usuário com login por e-mail ou telefone.
pub async fn cadastrar(repo: &dyn Repositorio, novo: &NovoUsuario) -> Result<Usuario, ErroAutenticacao> {
    let nome = novo.nome.trim();
    if nome.is_empty() {
        return Err(ErroAutenticacao::DadosInvalidos("O nome é obrigatório.".to_string()));
    }
    let login = novo.login.trim();
    if login.is_empty() {
        return Err(ErroAutenticacao::DadosInvalidos("O login é obrigatório.".to_string()));
    }
    if novo.senha.chars().count() < TAMANHO_MINIMO_SENHA {
        return Err(ErroAutenticacao::DadosInvalidos(format!(
            "A senha deve ter pelo menos {} caracteres.",
            TAMANHO_MINIMO_SENHA
        )));
    }

    if repo.buscar_usuario_por_login(novo.tipo_login, login).await?.is_some() {
        return Err(ErroAutenticacao::UsuarioJaExiste);
    }

    let (email, telefone) = match novo.tipo_login {
        TipoLogin::Email => (Some(login.to_string()), None),
        TipoLogin::Telefone => (None, Some(login.to_string())),
    };
    let dados = DadosNovoUsuario {
        nome: nome.to_string(),
        email,
        telefone,
        senha_hash: hash(&novo.senha, CUSTO_HASH)?,
    };

    // A conferência acima não impede dois cadastros simultâneos; a chave única decide
    let usuario = repo.criar_usuario(&dados).await.map_err(|e| match e {
        ErroRepositorio::Conflito(_) => ErroAutenticacao::UsuarioJaExiste,
        e => ErroAutenticacao::from(e),
    })?;
    tracing::info!(usuario_id = usuario.id, tipo_login = novo.tipo_login.coluna(), "Usuário cadastrado");
    Ok(usuario)
}

/// Confere as credenciais, abre uma sessão e emite o token dela.
pub async fn login(
    repo: &dyn Repositorio,
    req: &LoginRequest,
    jwt_secret: &str,
    duracao_sessao: Duration,
) -> Result<SessaoIniciada, ErroAutenticacao> {
    let usuario = repo
        .buscar_usuario_por_login(req.tipo_login, req.login.trim())
        .await?
        .ok_or(ErroAutenticacao::CredenciaisInvalidas)?;

    if !verify(&req.senha, &usuario.senha_hash)? {
        tracing::info!(usuario_id = usuario.id, "Senha incorreta no login");
        return Err(ErroAutenticacao::CredenciaisInvalidas);
    }

    let sessao = repo.criar_sessao(usuario.id, Utc::now() + duracao_sessao).await?;
    let token = emitir_token(&usuario, &sessao, jwt_secret)?;

    tracing::info!(usuario_id = usuario.id, sessao_id = sessao.id, "Sessão iniciada");
    Ok(SessaoIniciada { usuario, sessao, token })
}

/// JWT (HS256) da sessão; expira junto com ela.
pub fn emitir_token(usuario: &Usuario, sessao: &Sessao, jwt_secret: &str) -> Result<String, ErroAutenticacao> {
    let claims = Claims {
        sub: usuario.id,
        sid: sessao.id,
        name: usuario.nome.clone(),
        exp: sessao.expira_em.timestamp(),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )?;
    Ok(token)
}

/// Valida assinatura e expiração do token. Qualquer falha vira `SessaoInvalida`.
pub fn decodificar_token(token: &str, jwt_secret: &str) -> Result<Claims, ErroAutenticacao> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|dados| dados.claims)
    .map_err(|e| {
        tracing::debug!(error = %e, "Token rejeitado");
        ErroAutenticacao::SessaoInvalida
    })
}

/// Sessão ativa do token. Sessão ausente, revogada, expirada ou de outro usuário é inválida.
pub async fn sessao_do_token(repo: &dyn Repositorio, claims: &Claims) -> Result<Sessao, ErroAutenticacao> {
    match repo.buscar_sessao(claims.sid).await? {
        Some(sessao) if sessao.usuario_id == claims.sub && sessao.ativa(Utc::now()) => Ok(sessao),
        _ => Err(ErroAutenticacao::SessaoInvalida),
    }
}

pub async fn logout(repo: &dyn Repositorio, sessao_id: i32) -> Result<(), ErroAutenticacao> {
    if !repo.revogar_sessao(sessao_id).await? {
        return Err(ErroAutenticacao::SessaoInvalida);
    }
    tracing::info!(sessao_id, "Sessão encerrada");
    Ok(())
}
