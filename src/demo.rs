//! Demo service mounted by `remoting serve`.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use remoting_config::RoutesConfig;
use remoting_core::{RequestContext, RequestStream, ResponseSink, ServiceManager};
use remoting_protocols::{
    BindError, HttpMethod, RemoteData, RemoteFilter, RemoteOption, RemoteSorter, ServiceError,
};

const FRUITS: [&str; 8] = [
    "apple",
    "apricot",
    "banana",
    "cherry",
    "grape",
    "lemon",
    "mango",
    "pear",
];

const MAX_PAGE_SIZE: i32 = 100;

/// One row served by the fruit table source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct FruitRow {
    pub id: i32,
    pub name: String,
}

/// Built fresh for every call.
#[derive(Clone)]
pub(crate) struct DemoService {
    user: Option<String>,
}

impl DemoService {
    fn from_context(ctx: &RequestContext) -> Self {
        Self {
            user: ctx.header("x-user").map(str::to_string),
        }
    }

    async fn add(self, a: i64, b: i64) -> Result<i64, ServiceError> {
        a.checked_add(b).ok_or_else(overflow)
    }

    async fn divide(self, a: i64, b: i64) -> Result<i64, ServiceError> {
        if b == 0 {
            return Err(ServiceError::expected("DivisionByZero", "Cannot divide by zero"));
        }
        a.checked_div(b).ok_or_else(overflow)
    }

    async fn greet(self, name: String) -> Result<String, ServiceError> {
        Ok(match self.user {
            Some(user) => format!("Hello, {}! (from {})", name, user),
            None => format!("Hello, {}!", name),
        })
    }

    async fn now(self) -> Result<String, ServiceError> {
        Ok(Utc::now().to_rfc3339())
    }

    async fn whoami(self) -> Result<Option<String>, ServiceError> {
        Ok(self.user)
    }

    async fn fruits(
        self,
        search: Option<String>,
        initial: Option<String>,
        _state: Option<String>,
    ) -> Result<Vec<RemoteOption>, ServiceError> {
        if let Some(initial) = initial {
            return Ok(FRUITS
                .iter()
                .filter(|f| **f == initial)
                .map(|f| fruit_option(f))
                .collect());
        }
        let needle = search.unwrap_or_default().to_lowercase();
        Ok(FRUITS
            .iter()
            .filter(|f| f.contains(needle.as_str()))
            .map(|f| fruit_option(f))
            .collect())
    }

    async fn fruit_table(
        self,
        page: Option<i32>,
        size: Option<i32>,
        filters: Option<Vec<RemoteFilter>>,
        sorters: Option<Vec<RemoteSorter>>,
        _state: Option<String>,
    ) -> Result<RemoteData<FruitRow>, ServiceError> {
        let page = page.unwrap_or(1).max(1) as usize;
        let size = size.unwrap_or(5).clamp(1, MAX_PAGE_SIZE) as usize;

        let mut rows: Vec<FruitRow> = FRUITS
            .iter()
            .zip(1..)
            .map(|(name, id)| FruitRow {
                id,
                name: name.to_string(),
            })
            .filter(|row| {
                filters
                    .iter()
                    .flatten()
                    .filter(|f| f.field == "name")
                    .all(|f| row.name.contains(f.value.as_str()))
            })
            .collect();

        if let Some(sorter) = sorters.as_ref().and_then(|s| s.first()) {
            match sorter.field.as_str() {
                "name" => rows.sort_by(|a, b| a.name.cmp(&b.name)),
                _ => rows.sort_by_key(|row| row.id),
            }
            if sorter.is_descending() {
                rows.reverse();
            }
        }

        let last_page = i32::try_from(rows.len().div_ceil(size).max(1)).unwrap_or(i32::MAX);
        let data = rows
            .into_iter()
            .skip((page - 1).saturating_mul(size))
            .take(size)
            .collect();
        Ok(RemoteData::new(data, last_page))
    }

    async fn shout(self, mut requests: RequestStream<String>, responses: ResponseSink<String>) {
        while let Some(text) = requests.recv().await {
            if responses.send(text.to_uppercase()).await.is_err() {
                break;
            }
        }
    }
}

fn overflow() -> ServiceError {
    ServiceError::expected("Overflow", "Result out of range")
}

fn fruit_option(name: &str) -> RemoteOption {
    let mut text = name.to_string();
    if let Some(first) = text.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    RemoteOption::new(name, text)
}

/// Bind every demo route under the configured prefixes.
pub(crate) fn demo_service(routes: &RoutesConfig) -> Result<ServiceManager<DemoService>, BindError> {
    let mut manager = ServiceManager::new("Demo", DemoService::from_context)
        .with_prefixes(routes.http_prefix.as_str(), routes.ws_prefix.as_str());

    manager.bind(HttpMethod::Post, Some("add"), |s: DemoService, a: i64, b: i64| s.add(a, b))?;
    manager.bind(HttpMethod::Post, Some("divide"), |s: DemoService, a: i64, b: i64| {
        s.divide(a, b)
    })?;
    manager.bind(HttpMethod::Post, Some("greet"), |s: DemoService, name: String| s.greet(name))?;
    manager.bind(HttpMethod::Get, Some("now"), |s: DemoService| s.now())?;
    manager.bind(HttpMethod::Get, Some("whoami"), |s: DemoService| s.whoami())?;
    manager.bind_select_remote(Some("fruits"), |s: DemoService, search, initial, state| {
        s.fruits(search, initial, state)
    })?;
    manager.bind_tabulator_remote(
        Some("fruitTable"),
        |s: DemoService, page, size, filters, sorters, state| {
            s.fruit_table(page, size, filters, sorters, state)
        },
    )?;
    manager.bind_stream(
        Some("shout"),
        |s: DemoService, requests: RequestStream<String>, responses: ResponseSink<String>| {
            s.shout(requests, responses)
        },
    )?;

    Ok(manager)
}
