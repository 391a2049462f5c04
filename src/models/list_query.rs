//! Client-held list state serialized into query-string parameters

use crate::api::QueryPairs;
use crate::utils::parse_date;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    pub field: String,
    pub descending: bool,
}

impl Ordering {
    /// `-created_at` -> descending on created_at
    pub fn parse(raw: &str) -> Result<Self, String> {
        let (field, descending) = match raw.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };
        if field.is_empty() || !field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(format!("❌ Tri invalide: '{}'", raw));
        }
        Ok(Ordering {
            field: field.to_string(),
            descending,
        })
    }

    pub fn as_param(&self) -> String {
        if self.descending {
            format!("-{}", self.field)
        } else {
            self.field.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub search: Option<String>,
    pub kind: Option<String>,
    pub status: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub ordering: Option<Ordering>,
}

impl ListQuery {
    pub fn new(page_size: u32) -> Self {
        ListQuery {
            page: 1,
            page_size,
            search: None,
            kind: None,
            status: None,
            date_from: None,
            date_to: None,
            ordering: None,
        }
    }

    /// Parse list arguments: a page token (`p2` or `2`) and `key=value`
    /// filters (`search=`, `type=`, `status=`, `from=`, `to=`, `sort=`)
    pub fn from_args(args: &[&str], page_size: u32) -> Result<Self, String> {
        let mut query = ListQuery::new(page_size);

        for arg in args {
            if let Some((key, value)) = arg.split_once('=') {
                let value = value.trim();
                if value.is_empty() {
                    return Err(format!("❌ Valeur manquante pour '{}'", key));
                }
                match key.to_lowercase().as_str() {
                    "search" | "q" => query.search = Some(value.to_string()),
                    "type" => {
                        let kind = value.to_lowercase();
                        if kind != "deposit" && kind != "withdrawal" {
                            return Err("❌ type doit être 'deposit' ou 'withdrawal'".to_string());
                        }
                        query.kind = Some(kind);
                    }
                    "status" => query.status = Some(value.to_lowercase()),
                    "from" | "date_from" => {
                        parse_date(value)?;
                        query.date_from = Some(value.to_string());
                    }
                    "to" | "date_to" => {
                        parse_date(value)?;
                        query.date_to = Some(value.to_string());
                    }
                    "sort" | "ordering" => query.ordering = Some(Ordering::parse(value)?),
                    "size" | "page_size" => {
                        query.page_size = value
                            .parse::<u32>()
                            .ok()
                            .filter(|n| *n > 0 && *n <= 100)
                            .ok_or_else(|| "❌ size doit être entre 1 et 100".to_string())?;
                    }
                    other => return Err(format!("❌ Filtre inconnu: '{}'", other)),
                }
            } else {
                let page_arg = arg.to_lowercase();
                let page_str = page_arg.strip_prefix('p').unwrap_or(&page_arg);
                query.page = page_str
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| format!("❌ Numéro de page invalide: '{}'", arg))?;
            }
        }

        if let (Some(from), Some(to)) = (&query.date_from, &query.date_to) {
            // ISO dates compare lexically
            if from > to {
                return Err("❌ La date de début est après la date de fin".to_string());
            }
        }

        Ok(query)
    }

    pub fn to_query_pairs(&self) -> QueryPairs {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("page_size".to_string(), self.page_size.to_string()),
        ];
        let optional = [
            ("search", self.search.clone()),
            ("type", self.kind.clone()),
            ("status", self.status.clone()),
            ("date_from", self.date_from.clone()),
            ("date_to", self.date_to.clone()),
            ("ordering", self.ordering.as_ref().map(Ordering::as_param)),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                pairs.push((key.to_string(), value));
            }
        }
        pairs
    }

    /// One-line summary of the active filters, empty when none
    pub fn describe_filters(&self) -> String {
        let mut parts = Vec::new();
        if let Some(s) = &self.search {
            parts.push(format!("recherche \"{}\"", s));
        }
        if let Some(k) = &self.kind {
            parts.push(format!("type {}", k));
        }
        if let Some(s) = &self.status {
            parts.push(format!("statut {}", s));
        }
        match (&self.date_from, &self.date_to) {
            (Some(f), Some(t)) => parts.push(format!("du {} au {}", f, t)),
            (Some(f), None) => parts.push(format!("depuis le {}", f)),
            (None, Some(t)) => parts.push(format!("jusqu'au {}", t)),
            (None, None) => {}
        }
        if let Some(o) = &self.ordering {
            parts.push(format!("tri {}", o.as_param()));
        }
        parts.join(", ")
    }
}
