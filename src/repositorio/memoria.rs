// src/repositorio/memoria.rs

//! Repositório em memória usado pelos testes.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use super::{ErroRepositorio, Repositorio};
use crate::carrinho::carrinho_structs::{Carrinho, ItemCarrinho};
use crate::categorias::categoria_structs::Categoria;
use crate::favoritos::favoritos_structs::Favorito;
use crate::pedidos::pedidos_structs::{NovoPedido, Pedido, STATUS_NOVO};
use crate::produtos::produtos_structs::{FiltroProdutos, FotoProduto, Produto};
use crate::shared::shared_structs::Paginacao;
use crate::usuarios::usuario_structs::{DadosNovoUsuario, Sessao, TipoLogin, Usuario};
use crate::vendedores::vendedores_structs::Vendedor;

#[derive(Default)]
struct Tabelas {
    proximo_id: i32,
    produtos: Vec<Produto>,
    fotos: Vec<FotoProduto>,
    materiais: Vec<(i32, String)>,
    cores: Vec<(i32, String)>,
    categorias: Vec<Categoria>,
    vendedores: Vec<Vendedor>,
    usuarios: Vec<Usuario>,
    sessoes: Vec<Sessao>,
    carrinhos: Vec<Carrinho>,
    itens: Vec<ItemCarrinho>,
    pedidos: Vec<Pedido>,
    favoritos: Vec<Favorito>,
}

impl Tabelas {
    fn gerar_id(&mut self) -> i32 {
        self.proximo_id += 1;
        self.proximo_id
    }
}

/// Instante determinístico: cada id "nasce" um segundo depois do anterior.
pub fn instante(id: i32) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + i64::from(id), 0).unwrap()
}

/// Produto com valores padrão para os campos opcionais.
pub fn produto_exemplo(id: i32, nome: &str, preco: &str, estoque: Option<i32>) -> Produto {
    Produto {
        id,
        nome: nome.to_string(),
        descricao: None,
        largura: None,
        comprimento: None,
        altura: None,
        preco: preco.parse().unwrap(),
        estoque,
        categoria_id: None,
        subcategoria_id: None,
        material_id: None,
        cor_id: None,
        vendedor_id: None,
        na_pagina_principal: false,
        criado_em: instante(id),
    }
}

#[derive(Default)]
pub struct MemRepositorio {
    tabelas: Mutex<Tabelas>,
}

impl MemRepositorio {
    pub fn new() -> Self {
        Self::default()
    }

    fn tabelas(&self) -> MutexGuard<'_, Tabelas> {
        self.tabelas.lock().unwrap()
    }

    // --- Semeadura ---

    /// Cadastra um produto com id gerado e devolve a linha.
    pub fn novo_produto(&self, nome: &str, preco: &str, estoque: Option<i32>) -> Produto {
        self.com_produto(|id| produto_exemplo(id, nome, preco, estoque))
    }

    /// Cadastra um produto montado a partir do id gerado.
    pub fn com_produto(&self, montar: impl FnOnce(i32) -> Produto) -> Produto {
        let mut t = self.tabelas();
        let id = t.gerar_id();
        let produto = montar(id);
        t.produtos.push(produto.clone());
        produto
    }

    pub fn nova_foto(&self, produto_id: i32, url: &str, principal: bool) -> FotoProduto {
        let mut t = self.tabelas();
        let id = t.gerar_id();
        let foto = FotoProduto {
            id,
            produto_id,
            url: url.to_string(),
            principal,
            criado_em: instante(id),
        };
        t.fotos.push(foto.clone());
        foto
    }

    pub fn novo_material(&self, nome: &str) -> i32 {
        let mut t = self.tabelas();
        let id = t.gerar_id();
        t.materiais.push((id, nome.to_string()));
        id
    }

    pub fn nova_cor(&self, nome: &str) -> i32 {
        let mut t = self.tabelas();
        let id = t.gerar_id();
        t.cores.push((id, nome.to_string()));
        id
    }

    pub fn nova_categoria(&self, nome: &str, parent_id: Option<i32>) -> Categoria {
        let mut t = self.tabelas();
        let id = t.gerar_id();
        let categoria = Categoria {
            id,
            nome: nome.to_string(),
            parent_id,
        };
        t.categorias.push(categoria.clone());
        categoria
    }

    pub fn novo_vendedor(&self, nome: &str) -> Vendedor {
        let mut t = self.tabelas();
        let id = t.gerar_id();
        let vendedor = Vendedor {
            id,
            nome: nome.to_string(),
            descricao: Some(format!("Loja {nome}")),
            logo_url: None,
        };
        t.vendedores.push(vendedor.clone());
        vendedor
    }

    pub fn novo_carrinho(&self, usuario_id: i32, convertido: bool) -> Carrinho {
        let mut t = self.tabelas();
        let id = t.gerar_id();
        let carrinho = Carrinho {
            id,
            usuario_id,
            convertido,
            criado_em: instante(id),
        };
        t.carrinhos.push(carrinho.clone());
        carrinho
    }

    pub fn novo_item(&self, carrinho_id: i32, produto_id: i32, quantidade: i32) -> ItemCarrinho {
        let mut t = self.tabelas();
        let id = t.gerar_id();
        let item = ItemCarrinho {
            id,
            carrinho_id,
            produto_id,
            quantidade,
        };
        t.itens.push(item.clone());
        item
    }

    /// Pedido gravado diretamente, sem passar pela finalização (e sem marcar o carrinho).
    pub fn novo_pedido_bruto(&self, usuario_id: i32, carrinho_id: i32, total: &str) -> Pedido {
        let mut t = self.tabelas();
        let id = t.gerar_id();
        let pedido = Pedido {
            id,
            usuario_id,
            carrinho_id,
            status: STATUS_NOVO.to_string(),
            total: total.parse().unwrap(),
            criado_em: instante(id),
            atualizado_em: instante(id),
        };
        t.pedidos.push(pedido.clone());
        pedido
    }

    pub fn definir_preco(&self, produto_id: i32, preco: &str) {
        let mut t = self.tabelas();
        if let Some(p) = t.produtos.iter_mut().find(|p| p.id == produto_id) {
            p.preco = preco.parse().unwrap();
        }
    }

    /// Apaga o produto sem tocar nos itens que apontam para ele.
    pub fn remover_produto(&self, produto_id: i32) {
        self.tabelas().produtos.retain(|p| p.id != produto_id);
    }

    // --- Inspeção ---

    pub fn produto(&self, id: i32) -> Option<Produto> {
        self.tabelas().produtos.iter().find(|p| p.id == id).cloned()
    }

    pub fn pedidos(&self) -> Vec<Pedido> {
        self.tabelas().pedidos.clone()
    }

    pub fn carrinhos_de(&self, usuario_id: i32) -> Vec<Carrinho> {
        self.tabelas()
            .carrinhos
            .iter()
            .filter(|c| c.usuario_id == usuario_id)
            .cloned()
            .collect()
    }

    pub fn itens_de(&self, carrinho_id: i32) -> Vec<ItemCarrinho> {
        self.tabelas()
            .itens
            .iter()
            .filter(|i| i.carrinho_id == carrinho_id)
            .cloned()
            .collect()
    }

    pub fn total_favoritos(&self) -> usize {
        self.tabelas().favoritos.len()
    }

    pub fn usuario_por_email(&self, email: &str) -> Option<Usuario> {
        self.tabelas()
            .usuarios
            .iter()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned()
    }
}

fn nome_por_id(linhas: &[(i32, String)], id: i32) -> Option<String> {
    linhas.iter().find(|(i, _)| *i == id).map(|(_, n)| n.clone())
}

#[async_trait]
impl Repositorio for MemRepositorio {
    async fn listar_produtos(
        &self,
        filtro: &FiltroProdutos,
        paginacao: Paginacao,
    ) -> Result<Vec<Produto>, ErroRepositorio> {
        let t = self.tabelas();
        let termo = filtro.termo.as_deref().map(str::to_lowercase);

        let mut produtos: Vec<Produto> = t
            .produtos
            .iter()
            .filter(|p| match &termo {
                Some(termo) => p.nome.to_lowercase().contains(termo.as_str()),
                None => true,
            })
            .filter(|p| match filtro.categoria_id {
                Some(c) => p.categoria_id == Some(c) || p.subcategoria_id == Some(c),
                None => true,
            })
            .filter(|p| filtro.vendedor_id.map_or(true, |v| p.vendedor_id == Some(v)))
            .filter(|p| !filtro.apenas_destaques || p.na_pagina_principal)
            .cloned()
            .collect();

        produtos.sort_by(|a, b| b.criado_em.cmp(&a.criado_em).then(b.id.cmp(&a.id)));

        Ok(produtos
            .into_iter()
            .skip(paginacao.offset as usize)
            .take(paginacao.limit as usize)
            .collect())
    }

    async fn buscar_produto(&self, id: i32) -> Result<Option<Produto>, ErroRepositorio> {
        Ok(self.produto(id))
    }

    async fn buscar_produtos_por_ids(&self, ids: &[i32]) -> Result<Vec<Produto>, ErroRepositorio> {
        Ok(self
            .tabelas()
            .produtos
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn listar_fotos(&self, produto_id: i32) -> Result<Vec<FotoProduto>, ErroRepositorio> {
        self.listar_fotos_de_produtos(&[produto_id]).await
    }

    async fn listar_fotos_de_produtos(
        &self,
        produto_ids: &[i32],
    ) -> Result<Vec<FotoProduto>, ErroRepositorio> {
        let mut fotos: Vec<FotoProduto> = self
            .tabelas()
            .fotos
            .iter()
            .filter(|f| produto_ids.contains(&f.produto_id))
            .cloned()
            .collect();
        fotos.sort_by(|a, b| a.criado_em.cmp(&b.criado_em).then(a.id.cmp(&b.id)));
        Ok(fotos)
    }

    async fn buscar_nome_material(&self, id: i32) -> Result<Option<String>, ErroRepositorio> {
        Ok(nome_por_id(&self.tabelas().materiais, id))
    }

    async fn buscar_nome_cor(&self, id: i32) -> Result<Option<String>, ErroRepositorio> {
        Ok(nome_por_id(&self.tabelas().cores, id))
    }

    async fn listar_categorias(&self) -> Result<Vec<Categoria>, ErroRepositorio> {
        let mut categorias = self.tabelas().categorias.clone();
        categorias.sort_by(|a, b| a.nome.cmp(&b.nome).then(a.id.cmp(&b.id)));
        Ok(categorias)
    }

    async fn buscar_categoria(&self, id: i32) -> Result<Option<Categoria>, ErroRepositorio> {
        Ok(self.tabelas().categorias.iter().find(|c| c.id == id).cloned())
    }

    async fn buscar_vendedor(&self, id: i32) -> Result<Option<Vendedor>, ErroRepositorio> {
        Ok(self.tabelas().vendedores.iter().find(|v| v.id == id).cloned())
    }

    async fn buscar_usuario_por_login(
        &self,
        tipo: TipoLogin,
        login: &str,
    ) -> Result<Option<Usuario>, ErroRepositorio> {
        Ok(self
            .tabelas()
            .usuarios
            .iter()
            .find(|u| {
                let campo = match tipo {
                    TipoLogin::Email => &u.email,
                    TipoLogin::Telefone => &u.telefone,
                };
                campo.as_deref() == Some(login)
            })
            .cloned())
    }

    async fn buscar_usuario(&self, id: i32) -> Result<Option<Usuario>, ErroRepositorio> {
        Ok(self.tabelas().usuarios.iter().find(|u| u.id == id).cloned())
    }

    async fn criar_usuario(&self, dados: &DadosNovoUsuario) -> Result<Usuario, ErroRepositorio> {
        let mut t = self.tabelas();
        let repetido = t.usuarios.iter().any(|u| {
            (dados.email.is_some() && u.email == dados.email)
                || (dados.telefone.is_some() && u.telefone == dados.telefone)
        });
        if repetido {
            return Err(ErroRepositorio::Conflito("login já cadastrado".to_string()));
        }
        let id = t.gerar_id();
        let usuario = Usuario {
            id,
            nome: dados.nome.clone(),
            email: dados.email.clone(),
            telefone: dados.telefone.clone(),
            senha_hash: dados.senha_hash.clone(),
        };
        t.usuarios.push(usuario.clone());
        Ok(usuario)
    }

    async fn criar_sessao(
        &self,
        usuario_id: i32,
        expira_em: DateTime<Utc>,
    ) -> Result<Sessao, ErroRepositorio> {
        let mut t = self.tabelas();
        let id = t.gerar_id();
        let sessao = Sessao {
            id,
            usuario_id,
            criada_em: Utc::now(),
            expira_em,
            revogada_em: None,
        };
        t.sessoes.push(sessao.clone());
        Ok(sessao)
    }

    async fn buscar_sessao(&self, id: i32) -> Result<Option<Sessao>, ErroRepositorio> {
        Ok(self.tabelas().sessoes.iter().find(|s| s.id == id).cloned())
    }

    async fn revogar_sessao(&self, id: i32) -> Result<bool, ErroRepositorio> {
        let mut t = self.tabelas();
        match t.sessoes.iter_mut().find(|s| s.id == id && s.revogada_em.is_none()) {
            Some(sessao) => {
                sessao.revogada_em = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn listar_carrinhos(&self, usuario_id: i32) -> Result<Vec<Carrinho>, ErroRepositorio> {
        let mut carrinhos = self.carrinhos_de(usuario_id);
        carrinhos.sort_by(|a, b| b.criado_em.cmp(&a.criado_em).then(b.id.cmp(&a.id)));
        Ok(carrinhos)
    }

    async fn listar_carrinhos_com_pedido(&self, usuario_id: i32) -> Result<Vec<i32>, ErroRepositorio> {
        Ok(self
            .tabelas()
            .pedidos
            .iter()
            .filter(|p| p.usuario_id == usuario_id)
            .map(|p| p.carrinho_id)
            .collect())
    }

    async fn criar_carrinho(&self, usuario_id: i32) -> Result<Carrinho, ErroRepositorio> {
        Ok(self.novo_carrinho(usuario_id, false))
    }

    async fn listar_itens(&self, carrinho_ids: &[i32]) -> Result<Vec<ItemCarrinho>, ErroRepositorio> {
        Ok(self
            .tabelas()
            .itens
            .iter()
            .filter(|i| carrinho_ids.contains(&i.carrinho_id))
            .cloned()
            .collect())
    }

    async fn contar_itens(&self, carrinho_id: i32) -> Result<i64, ErroRepositorio> {
        Ok(self.itens_de(carrinho_id).len() as i64)
    }

    async fn buscar_item(
        &self,
        carrinho_id: i32,
        produto_id: i32,
    ) -> Result<Option<ItemCarrinho>, ErroRepositorio> {
        Ok(self
            .tabelas()
            .itens
            .iter()
            .find(|i| i.carrinho_id == carrinho_id && i.produto_id == produto_id)
            .cloned())
    }

    async fn inserir_item(
        &self,
        carrinho_id: i32,
        produto_id: i32,
        quantidade: i32,
    ) -> Result<ItemCarrinho, ErroRepositorio> {
        Ok(self.novo_item(carrinho_id, produto_id, quantidade))
    }

    async fn atualizar_quantidade(
        &self,
        item_id: i32,
        quantidade: i32,
    ) -> Result<ItemCarrinho, ErroRepositorio> {
        let mut t = self.tabelas();
        let item = t
            .itens
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| ErroRepositorio::NaoEncontrado(format!("item de carrinho {item_id}")))?;
        item.quantidade = quantidade;
        Ok(item.clone())
    }

    async fn remover_item(&self, item_id: i32) -> Result<u64, ErroRepositorio> {
        let mut t = self.tabelas();
        let antes = t.itens.len();
        t.itens.retain(|i| i.id != item_id);
        Ok((antes - t.itens.len()) as u64)
    }

    async fn registrar_pedido(&self, pedido: &NovoPedido) -> Result<Pedido, ErroRepositorio> {
        // Um único lock cobre todos os passos, como a transação do PostgreSQL
        let mut t = self.tabelas();

        match t.carrinhos.iter_mut().find(|c| c.id == pedido.carrinho_id && !c.convertido) {
            Some(c) => c.convertido = true,
            None => {
                return Err(ErroRepositorio::Conflito(format!(
                    "carrinho {} já finalizado",
                    pedido.carrinho_id
                )))
            }
        }

        let id = t.gerar_id();
        let agora = Utc::now();
        let criado = Pedido {
            id,
            usuario_id: pedido.usuario_id,
            carrinho_id: pedido.carrinho_id,
            status: STATUS_NOVO.to_string(),
            total: pedido.total.clone(),
            criado_em: agora,
            atualizado_em: agora,
        };
        t.pedidos.push(criado.clone());

        for item in &pedido.itens {
            if let Some(p) = t.produtos.iter_mut().find(|p| p.id == item.produto_id) {
                p.estoque = p.estoque.map(|e| (e - item.quantidade).max(0));
            }
        }

        let novo_id = t.gerar_id();
        t.carrinhos.push(Carrinho {
            id: novo_id,
            usuario_id: pedido.usuario_id,
            convertido: false,
            criado_em: instante(novo_id),
        });

        Ok(criado)
    }

    async fn listar_pedidos(&self, usuario_id: i32) -> Result<Vec<Pedido>, ErroRepositorio> {
        let mut pedidos: Vec<Pedido> = self
            .tabelas()
            .pedidos
            .iter()
            .filter(|p| p.usuario_id == usuario_id)
            .cloned()
            .collect();
        pedidos.sort_by(|a, b| b.criado_em.cmp(&a.criado_em).then(b.id.cmp(&a.id)));
        Ok(pedidos)
    }

    async fn buscar_favorito(
        &self,
        usuario_id: i32,
        produto_id: i32,
    ) -> Result<Option<Favorito>, ErroRepositorio> {
        Ok(self
            .tabelas()
            .favoritos
            .iter()
            .find(|f| f.usuario_id == usuario_id && f.produto_id == produto_id)
            .cloned())
    }

    async fn inserir_favorito(
        &self,
        usuario_id: i32,
        produto_id: i32,
    ) -> Result<Favorito, ErroRepositorio> {
        let mut t = self.tabelas();
        if let Some(existente) = t
            .favoritos
            .iter()
            .find(|f| f.usuario_id == usuario_id && f.produto_id == produto_id)
        {
            return Ok(existente.clone());
        }
        let id = t.gerar_id();
        let favorito = Favorito {
            id,
            usuario_id,
            produto_id,
        };
        t.favoritos.push(favorito.clone());
        Ok(favorito)
    }

    async fn remover_favorito(&self, usuario_id: i32, produto_id: i32) -> Result<u64, ErroRepositorio> {
        let mut t = self.tabelas();
        let antes = t.favoritos.len();
        t.favoritos
            .retain(|f| !(f.usuario_id == usuario_id && f.produto_id == produto_id));
        Ok((antes - t.favoritos.len()) as u64)
    }

    async fn listar_favoritos(&self, usuario_id: i32) -> Result<Vec<Favorito>, ErroRepositorio> {
        let mut favoritos: Vec<Favorito> = self
            .tabelas()
            .favoritos
            .iter()
            .filter(|f| f.usuario_id == usuario_id)
            .cloned()
            .collect();
        favoritos.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(favoritos)
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;

    use super::*;

    #[actix_web::test]
    async fn mesmo_carrinho_nao_vira_dois_pedidos() {
        let repo = MemRepositorio::new();
        let vaso = repo.novo_produto("Vaso", "20.00", Some(10));
        let carrinho = repo.novo_carrinho(1, false);
        let item = repo.novo_item(carrinho.id, vaso.id, 3);
        let pedido = NovoPedido {
            usuario_id: 1,
            carrinho_id: carrinho.id,
            total: "60.00".parse::<BigDecimal>().unwrap(),
            itens: vec![item],
        };

        repo.registrar_pedido(&pedido).await.unwrap();
        let repetido = repo.registrar_pedido(&pedido).await;

        assert!(matches!(repetido, Err(ErroRepositorio::Conflito(_))));
        assert_eq!(repo.pedidos().len(), 1);
        assert_eq!(repo.produto(vaso.id).unwrap().estoque, Some(7));
        assert_eq!(repo.carrinhos_de(1).len(), 2);
    }

    #[actix_web::test]
    async fn login_repetido_e_conflito() {
        let repo = MemRepositorio::new();
        let dados = DadosNovoUsuario {
            nome: "Ana".to_string(),
            email: Some("ana@exemplo.com".to_string()),
            telefone: None,
            senha_hash: "hash".to_string(),
        };

        repo.criar_usuario(&dados).await.unwrap();

        assert!(matches!(repo.criar_usuario(&dados).await, Err(ErroRepositorio::Conflito(_))));
    }
}
