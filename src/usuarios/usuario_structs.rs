// src/usuarios/usuario_structs.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estrutura que representa um usuário no banco de dados.
/// A senha é armazenada como um hash bcrypt e nunca é serializada.
#[derive(Debug, Clone, FromRow)]
pub struct Usuario {
    pub id: i32,
    pub nome: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub senha_hash: String,
}

/// Dados públicos do usuário devolvidos pela API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerfilUsuario {
    pub id: i32,
    pub nome: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
}

impl From<Usuario> for PerfilUsuario {
    fn from(u: Usuario) -> Self {
        Self {
            id: u.id,
            nome: u.nome,
            email: u.email,
            telefone: u.telefone,
        }
    }
}

/// Campo usado como login: e-mail ou telefone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoLogin {
    Email,
    Telefone,
}

impl TipoLogin {
    /// Nome da coluna da tabela `usuarios` correspondente.
    pub fn coluna(self) -> &'static str {
        match self {
            TipoLogin::Email => "email",
            TipoLogin::Telefone => "telefone",
        }
    }
}

/// Estrutura para receber dados de um novo usuário na requisição de cadastro.
#[derive(Debug, Deserialize)]
pub struct NovoUsuario {
    pub nome: String,
    pub tipo_login: TipoLogin,
    pub login: String,
    pub senha: String, // Senha em texto claro (será hashed antes de salvar)
}

/// Linha a inserir na tabela `usuarios`, já com a senha em hash.
#[derive(Debug, Clone, PartialEq)]
pub struct DadosNovoUsuario {
    pub nome: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub senha_hash: String,
}

/// Estrutura para receber dados de login do usuário.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub tipo_login: TipoLogin,
    pub login: String,
    pub senha: String, // Senha em texto claro
}

/// Estrutura para o payload do JWT (Claims).
/// Contém o usuário, a sessão que o token representa e a expiração.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,     // Subject (ID do usuário)
    pub sid: i32,     // ID da sessão
    pub name: String, // Nome do usuário
    pub exp: i64,     // Expiration Time (timestamp Unix)
}

/// Sessão de login. Criada no login, encerrada no logout ou ao expirar.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Sessao {
    pub id: i32,
    pub usuario_id: i32,
    pub criada_em: DateTime<Utc>,
    pub expira_em: DateTime<Utc>,
    pub revogada_em: Option<DateTime<Utc>>,
}

impl Sessao {
    pub fn ativa(&self, agora: DateTime<Utc>) -> bool {
        self.revogada_em.is_none() && self.expira_em > agora
    }
}

/// Estrutura para a resposta de sucesso do login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub status: String,
    pub message: String,
    pub usuario: PerfilUsuario,
    pub token: String,
    pub expira_em: DateTime<Utc>,
}
