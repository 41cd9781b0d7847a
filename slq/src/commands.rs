//! CLI command implementations.

use std::io::{self, Read};
use std::path::Path;

use sleuth::config::resolve_config_path;
use sleuth::{parse_filter, Catalog, ClientConfig, Dialect, FilterGroup, Query, SortDirection};

/// Options for `slq build`.
pub struct BuildOptions {
    pub any: bool,
    pub page_size: Option<u32>,
    pub page_number: Option<u32>,
    pub page_token: Option<String>,
    pub sort_key: Option<String>,
    pub sort_dir: Option<String>,
    pub dialect: Option<String>,
    pub pretty: bool,
}

/// Print a query as compact or pretty JSON.
fn print_query(query: &Query, pretty: bool) -> sleuth::Result<()> {
    if pretty {
        println!("{}", query.to_json_pretty()?);
    } else {
        println!("{}", query.to_json());
    }
    Ok(())
}

pub fn build(filters: &[String], opts: &BuildOptions) -> sleuth::Result<()> {
    let config = ClientConfig::load()?;

    let groups = filters
        .iter()
        .map(|expr| parse_filter(expr))
        .collect::<sleuth::Result<Vec<FilterGroup>>>()?;

    let mut query = if opts.any {
        Query::any(groups)?
    } else {
        Query::all(groups)?
    };

    let dialect = match &opts.dialect {
        Some(d) => d.parse::<Dialect>()?,
        None => config.dialect,
    };
    query.set_dialect(dialect);
    query.set_page_size(opts.page_size.unwrap_or(config.page_size))?;
    query.set_page_number(opts.page_number);
    query.set_page_token(opts.page_token.clone());
    if let Some(key) = &opts.sort_key {
        query.set_sort_key(key.as_str())?;
    }
    if let Some(dir) = &opts.sort_dir {
        query.set_sort_direction(dir.parse::<SortDirection>()?);
    }

    tracing::debug!(groups = query.groups().len(), dialect = %dialect, "built query");
    print_query(&query, opts.pretty)
}

pub fn decode(file: Option<&str>, to: Option<&str>, pretty: bool) -> sleuth::Result<()> {
    let input = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let mut query = Query::from_json(&input)?;
    if let Some(dialect) = to {
        query.set_dialect(dialect.parse::<Dialect>()?);
    }
    print_query(&query, pretty)
}

pub fn fields(kind: Option<&str>) -> sleuth::Result<()> {
    let catalogs = match kind {
        Some(k) => vec![k.parse::<Catalog>()?],
        None => vec![Catalog::FileEvent, Catalog::Alert],
    };

    for (i, catalog) in catalogs.iter().enumerate() {
        if catalogs.len() > 1 {
            if i > 0 {
                println!();
            }
            println!("# {}", catalog_name(*catalog));
        }
        for field in catalog.fields() {
            println!("{:<24} {}", field.term(), field.value_type());
        }
    }
    Ok(())
}

fn catalog_name(catalog: Catalog) -> &'static str {
    match catalog {
        Catalog::FileEvent => "file-event",
        Catalog::Alert => "alert",
    }
}

pub fn config(path: Option<&str>) -> sleuth::Result<()> {
    let path = match path {
        Some(p) => Path::new(p).to_path_buf(),
        None => resolve_config_path()?,
    };
    let config = ClientConfig::load_from(&path)?;

    let contents = toml::to_string_pretty(&config)
        .map_err(|e| sleuth::Error::Config(format!("Failed to serialize config: {}", e)))?;
    println!("# {}", path.display());
    print!("{}", contents);
    Ok(())
}
