// src/usuarios/auth_middleware.rs

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;

use super::usuario_service::{self, ErroAutenticacao};
use crate::shared::erros::ApiError;
use crate::AppState;

/// Usuário autenticado da requisição, extraído do token JWT e da sessão que ele representa.
#[derive(Debug, Clone)]
pub struct UsuarioAutenticado {
    pub usuario_id: i32,
    pub nome: String,
    pub sessao_id: i32,
}

/// Extrator de autenticação para Actix Web.
/// Exige `Authorization: Bearer <token>`, valida o token e confere no banco
/// se a sessão ainda está ativa.
impl FromRequest for UsuarioAutenticado {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // Acessa o AppState para obter a chave secreta e o repositório
        let estado = req.app_data::<web::Data<AppState>>().cloned();
        let token = token_do_cabecalho(req);

        Box::pin(async move {
            let Some(estado) = estado else {
                return Err(ApiError::Interno("AppState não disponível no extrator".to_string()));
            };
            let token = token.map_err(ApiError::NaoAutorizado)?;

            let claims = usuario_service::decodificar_token(&token, &estado.jwt_secret)?;
            let sessao = usuario_service::sessao_do_token(estado.repositorio.as_ref(), &claims)
                .await
                .map_err(|e| match e {
                    ErroAutenticacao::Repositorio(e) => {
                        tracing::warn!(error = %e, sessao_id = claims.sid, "Erro ao carregar sessão");
                        ApiError::from(ErroAutenticacao::SessaoInvalida)
                    }
                    outro => ApiError::from(outro),
                })?;

            Ok(UsuarioAutenticado {
                usuario_id: claims.sub,
                nome: claims.name,
                sessao_id: sessao.id,
            })
        })
    }
}

fn token_do_cabecalho(req: &HttpRequest) -> Result<String, String> {
    let valor = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| "Token de autenticação ausente.".to_string())?
        .to_str()
        .map_err(|_| "Token de autenticação inválido.".to_string())?;

    match valor.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err("Formato de token inválido. Esperado 'Bearer <token>'.".to_string()),
    }
}
