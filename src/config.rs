// src/config.rs

//! Configuração carregada de variáveis de ambiente.
//!
//! Obrigatórias:
//! - `DATABASE_URL` - string de conexão PostgreSQL
//! - `JWT_SECRET` - chave de assinatura dos tokens (mínimo de 32 caracteres)
//!
//! Opcionais:
//! - `BIND_ADDR` - endereço do servidor (padrão: 127.0.0.1:8080)
//! - `SESSAO_HORAS` - duração das sessões de login, de 1 a 8760 (padrão: 24)
//! - `EXECUTAR_MIGRACOES` - aplica `migrations/` na subida (padrão: true)

use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

const TAMANHO_MINIMO_SEGREDO: usize = 32;
const MAXIMO_SESSAO_HORAS: i64 = 24 * 365;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ErroConfig {
    #[error("Variável de ambiente ausente: {0}")]
    Ausente(String),

    #[error("Variável de ambiente {0} inválida: {1}")]
    Invalida(String, String),
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
    pub duracao_sessao: Duration,
    pub executar_migracoes: bool,
}

// Não imprime a URL do banco (tem senha) nem o segredo do JWT
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("bind_addr", &self.bind_addr)
            .field("duracao_sessao", &self.duracao_sessao)
            .field("executar_migracoes", &self.executar_migracoes)
            .finish()
    }
}

impl Config {
    /// Lê o ambiente do processo, depois de carregar o `.env` se existir.
    pub fn from_env() -> Result<Self, ErroConfig> {
        // Sem .env tudo vem do ambiente
        let _ = dotenvy::dotenv();
        Self::from_lookup(|chave| std::env::var(chave).ok())
    }

    /// Monta a configuração a partir de uma função de consulta às variáveis.
    pub fn from_lookup(buscar: impl Fn(&str) -> Option<String>) -> Result<Self, ErroConfig> {
        let obrigatoria = |chave: &str| {
            buscar(chave)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ErroConfig::Ausente(chave.to_string()))
        };

        let database_url = obrigatoria("DATABASE_URL")?;

        let jwt_secret = obrigatoria("JWT_SECRET")?;
        if jwt_secret.chars().count() < TAMANHO_MINIMO_SEGREDO {
            return Err(ErroConfig::Invalida(
                "JWT_SECRET".to_string(),
                format!("deve ter pelo menos {} caracteres", TAMANHO_MINIMO_SEGREDO),
            ));
        }

        let bind_addr = buscar("BIND_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8080".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ErroConfig::Invalida("BIND_ADDR".to_string(), e.to_string()))?;

        let horas = match buscar("SESSAO_HORAS") {
            None => 24,
            Some(valor) => match valor.trim().parse::<i64>() {
                Ok(h) if (1..=MAXIMO_SESSAO_HORAS).contains(&h) => h,
                _ => {
                    return Err(ErroConfig::Invalida(
                        "SESSAO_HORAS".to_string(),
                        format!("esperado um inteiro entre 1 e {}, veio {:?}", MAXIMO_SESSAO_HORAS, valor),
                    ))
                }
            },
        };

        let executar_migracoes = match buscar("EXECUTAR_MIGRACOES").as_deref().map(str::trim) {
            None => true,
            Some("true" | "1") => true,
            Some("false" | "0") => false,
            Some(outro) => {
                return Err(ErroConfig::Invalida(
                    "EXECUTAR_MIGRACOES".to_string(),
                    format!("esperado true ou false, veio {:?}", outro),
                ))
            }
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            duracao_sessao: Duration::hours(horas),
            executar_migracoes,
        })
    }
}
