// src/usuarios/usuario_router.rs

use actix_web::{get, post, web, HttpResponse};

// Importa as structs do módulo de usuários
use super::auth_middleware::UsuarioAutenticado;
use super::usuario_service::{self, ErroAutenticacao};
use super::usuario_structs::{AuthResponse, LoginRequest, NovoUsuario, PerfilUsuario};
use crate::shared::erros::ApiError;
use crate::shared::shared_structs::GenericResponse;
use crate::AppState;

/// Rota para cadastrar um novo usuário.
#[post("/usuarios/cadastro")]
pub async fn cadastrar_usuario(
    data: web::Data<AppState>,
    novo_usuario: web::Json<NovoUsuario>,
) -> Result<HttpResponse, ApiError> {
    let usuario = usuario_service::cadastrar(data.repositorio.as_ref(), &novo_usuario).await?;

    Ok(HttpResponse::Created().json(GenericResponse::sucesso(
        format!("Usuário cadastrado com sucesso! ID: {}", usuario.id),
        PerfilUsuario::from(usuario),
    )))
}

/// Rota para login de usuário.
#[post("/usuarios/login")]
pub async fn login_usuario(
    data: web::Data<AppState>,
    login_request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let iniciada = usuario_service::login(
        data.repositorio.as_ref(),
        &login_request,
        &data.jwt_secret,
        data.duracao_sessao,
    )
    .await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        status: "success".to_string(),
        message: "Login bem-sucedido!".to_string(),
        expira_em: iniciada.sessao.expira_em,
        usuario: PerfilUsuario::from(iniciada.usuario),
        token: iniciada.token,
    }))
}

/// Rota para encerrar a sessão do token usado na requisição.
#[post("/usuarios/logout")]
pub async fn logout_usuario(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
) -> Result<HttpResponse, ApiError> {
    usuario_service::logout(data.repositorio.as_ref(), usuario.sessao_id).await?;

    Ok(HttpResponse::Ok().json(GenericResponse::ok("Sessão encerrada.")))
}

/// Rota para o perfil do usuário autenticado.
#[get("/usuarios/me")]
pub async fn perfil_usuario(
    data: web::Data<AppState>,
    usuario: UsuarioAutenticado,
) -> Result<HttpResponse, ApiError> {
    let encontrado = data
        .repositorio
        .buscar_usuario(usuario.usuario_id)
        .await?
        .ok_or(ErroAutenticacao::SessaoInvalida)?;

    Ok(HttpResponse::Ok().json(GenericResponse::sucesso(
        "Usuário autenticado.",
        PerfilUsuario::from(encontrado),
    )))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use serde_json::json;

    use crate::repositorio::memoria::MemRepositorio;
    use crate::rotas;
    use crate::shared::shared_structs::GenericResponse;
    use crate::testes::estado_de_teste;
    use crate::usuarios::usuario_structs::{AuthResponse, PerfilUsuario};

    #[actix_web::test]
    async fn cadastro_login_perfil_e_logout() {
        let (estado, _) = estado_de_teste(MemRepositorio::new());
        let app = test::init_service(App::new().app_data(estado).configure(rotas::configurar)).await;

        let req = test::TestRequest::post()
            .uri("/usuarios/cadastro")
            .set_json(json!({
                "nome": "Lia Costa",
                "tipo_login": "telefone",
                "login": "11988887777",
                "senha": "segredo1"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/usuarios/login")
            .set_json(json!({ "tipo_login": "telefone", "login": "11988887777", "senha": "segredo1" }))
            .to_request();
        let login: AuthResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(login.usuario.nome, "Lia Costa");
        let auth = ("Authorization", format!("Bearer {}", login.token));

        let req = test::TestRequest::get().uri("/usuarios/me").insert_header(auth.clone()).to_request();
        let perfil: GenericResponse<PerfilUsuario> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(perfil.body.unwrap().telefone.as_deref(), Some("11988887777"));

        let req = test::TestRequest::post().uri("/usuarios/logout").insert_header(auth.clone()).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        // O token continua assinado, mas a sessão foi revogada
        let req = test::TestRequest::get().uri("/usuarios/me").insert_header(auth).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn cadastro_repetido_e_conflito_e_senha_errada_e_401() {
        let (estado, _) = estado_de_teste(MemRepositorio::new());
        let app = test::init_service(App::new().app_data(estado).configure(rotas::configurar)).await;
        let cadastro = json!({
            "nome": "Mia",
            "tipo_login": "email",
            "login": "mia@exemplo.com",
            "senha": "segredo1"
        });

        let req = test::TestRequest::post().uri("/usuarios/cadastro").set_json(&cadastro).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
        let req = test::TestRequest::post().uri("/usuarios/cadastro").set_json(&cadastro).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::post()
            .uri("/usuarios/login")
            .set_json(json!({ "tipo_login": "email", "login": "mia@exemplo.com", "senha": "errada1" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn senha_curta_e_400() {
        let (estado, _) = estado_de_teste(MemRepositorio::new());
        let app = test::init_service(App::new().app_data(estado).configure(rotas::configurar)).await;

        let req = test::TestRequest::post()
            .uri("/usuarios/cadastro")
            .set_json(json!({ "nome": "Noé", "tipo_login": "email", "login": "noe@x.com", "senha": "123" }))
            .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
