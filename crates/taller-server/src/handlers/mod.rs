pub mod auth;
pub mod catalogo;
pub mod clientes;
pub mod cotizaciones;
pub mod dashboard;
pub mod equipos;
pub mod ordenes;
pub mod transferencias;

use serde::{Deserialize, Deserializer, Serialize};

pub const PAGE_SIZE: u64 = 10;

pub(crate) fn primera_pagina() -> u64 {
    1
}

/// Distinguish an absent JSON field from an explicit null: absent stays
/// `None`, null becomes `Some(None)`.
pub(crate) fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

/// Paginated listing envelope.
#[derive(Debug, Serialize)]
pub struct Paginado<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
}

impl<T> Paginado<T> {
    /// Paginate an already-filtered in-memory vector. Accent-insensitive
    /// search filters in the application, so those listings paginate here
    /// instead of in SQL.
    pub fn from_vec(all: Vec<T>, page: u64) -> Self {
        let page = page.max(1);
        let total = all.len() as u64;
        let pages = total.div_ceil(PAGE_SIZE).max(1);
        let page = page.min(pages);

        let start = ((page - 1) * PAGE_SIZE) as usize;
        let items: Vec<T> = all.into_iter().skip(start).take(PAGE_SIZE as usize).collect();

        Self { items, total, page, pages }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vec_slices_pages() {
        let all: Vec<i32> = (0..25).collect();
        let p1 = Paginado::from_vec(all.clone(), 1);
        assert_eq!(p1.items.len(), 10);
        assert_eq!(p1.total, 25);
        assert_eq!(p1.pages, 3);

        let p3 = Paginado::from_vec(all.clone(), 3);
        assert_eq!(p3.items, vec![20, 21, 22, 23, 24]);

        // Out-of-range pages clamp instead of returning empty.
        let p9 = Paginado::from_vec(all, 9);
        assert_eq!(p9.page, 3);
        assert_eq!(p9.items.len(), 5);
    }

    #[test]
    fn from_vec_empty() {
        let p = Paginado::<i32>::from_vec(vec![], 1);
        assert_eq!(p.total, 0);
        assert_eq!(p.pages, 1);
        assert!(p.items.is_empty());
    }
}
