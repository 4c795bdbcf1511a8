use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use serde_json::{Value, json};

use profiledex_core::kv::FileKeyValueStore;
use profiledex_core::store::{Outcome, Persistence};
use profiledex_core::view::{available_hair_colors, available_traits};
use profiledex_core::wire::{decode_data, encode_card, encode_id, encode_profile, normalize};
use profiledex_core::{
    BackendKind, CatalogConfig, FilterOptions, Preferences, Profile, ProfileData, ProfileId,
    ProfileStore, SortDirection, ViewQuery, apply_view, build_store,
};

use crate::cli::{Cli, Commands, EditArgs, ListArgs, NormalizeArgs, ProfileInputArgs};

mod input;
mod support;


use self::input::apply_flags;
use self::support::{print_json, read_json_source};

pub(crate) fn run(cli: Cli) -> Result<()> {
    let Cli {
        config,
        data_dir,
        backend,
        command,
    } = cli;

    if let Commands::Normalize(args) = &command {
        return run_normalize(args);
    }

    let config = resolve_config(config.as_deref(), data_dir, backend)?;
    if let Commands::Grid(args) = &command {
        let preferences = Preferences::new(Arc::new(FileKeyValueStore::new(&config.data_dir)));
        if let Some(size) = args.size {
            preferences.set_grid_size(size)?;
        }
        return print_json(&json!({ "grid_size": preferences.grid_size().columns() }));
    }

    let store = build_store(&config).context("failed to configure profile store")?;
    match command {
        Commands::Init => {
            store.init()?;
            print_json(&json!({
                "status": "ok",
                "backend": store.backend_kind().as_str(),
                "data_dir": config.data_dir,
            }))?;
        }
        Commands::Ls(args) => {
            let listing = store.list();
            if let Some(warning) = &listing.warning {
                tracing::warn!(source = listing.source.as_str(), %warning, "showing degraded listing");
            }
            let query = list_query(args);
            let view = apply_view(&listing.profiles, &query);
            print_json(&view.into_iter().map(encode_card).collect::<Vec<_>>())?;
        }
        Commands::Show(args) => {
            let profile = store.get(&ProfileId::parse(&args.id)?)?;
            print_json(&encode_card(&profile))?;
        }
        Commands::Add(args) => {
            let data = read_new_profile(args)?;
            print_written(store.create(&data)?)?;
        }
        Commands::Edit(args) => {
            let (id, data) = read_edited_profile(&store, args)?;
            print_written(store.update(&id, &data)?)?;
        }
        Commands::Rm(args) => {
            let id = ProfileId::parse(&args.id)?;
            let outcome = store.delete(&id)?;
            print_json(&json!({
                "id": encode_id(&id),
                "deleted": true,
                "persisted": outcome.persistence.as_str(),
            }))?;
        }
        Commands::Facets => {
            let listing = store.list();
            print_json(&json!({
                "source": listing.source,
                "traits": available_traits(&listing.profiles),
                "hair_colors": available_hair_colors(&listing.profiles),
            }))?;
        }
        Commands::Web(args) => {
            profiledex_web::serve_web(store, &args.host, args.port)?;
        }
        Commands::Grid(_) | Commands::Normalize(_) => {}
    }
    Ok(())
}

fn resolve_config(
    file: Option<&Path>,
    data_dir: Option<PathBuf>,
    backend: Option<BackendKind>,
) -> Result<CatalogConfig> {
    let mut config = CatalogConfig::load(file).context("failed to load configuration")?;
    if let Some(data_dir) = data_dir {
        config.data_dir = data_dir;
    }
    if backend.is_some() {
        config.backend = backend;
    }
    tracing::debug!(?config, "configuration resolved");
    Ok(config)
}

fn list_query(args: ListArgs) -> ViewQuery {
    ViewQuery {
        search: args.search,
        filter: FilterOptions {
            fictional: args.fictional,
            trait_contains: args.trait_contains,
            hair_color: args.hair_color,
        },
        sort_field: args.sort,
        direction: if args.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        },
    }
}

fn read_new_profile(args: ProfileInputArgs) -> Result<ProfileData> {
    if let Some(path) = &args.json {
        return Ok(decode_data(&read_json_source(path)?)?);
    }
    if args.name.is_none() {
        bail!("add requires --name or --json");
    }
    let mut data = ProfileData::default();
    apply_flags(&mut data, args);
    Ok(data)
}

fn read_edited_profile(store: &ProfileStore, args: EditArgs) -> Result<(ProfileId, ProfileData)> {
    let EditArgs { id, input } = args;
    let id = ProfileId::parse(&id)?;
    if let Some(path) = &input.json {
        return Ok((id, decode_data(&read_json_source(path)?)?));
    }
    let mut data = store.get(&id)?.data;
    apply_flags(&mut data, input);
    Ok((id, data))
}

fn print_written(outcome: Outcome<Profile>) -> Result<()> {
    let Outcome { value, persistence } = outcome;
    if let Persistence::CacheOnly { reason } = &persistence {
        tracing::warn!(id = %value.id, %reason, "change saved to the local cache only");
    }
    print_json(&json!({
        "profile": encode_profile(&value),
        "persisted": persistence.as_str(),
    }))
}

fn run_normalize(args: &NormalizeArgs) -> Result<()> {
    let raw = read_json_source(&args.input)?;
    let normalized = normalize_document(&raw)?;
    match &args.output {
        Some(path) => {
            let mut rendered = serde_json::to_string_pretty(&normalized)?;
            rendered.push('\n');
            fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "normalized records written");
            Ok(())
        }
        None => print_json(&normalized),
    }
}

/// Normalizes one record or an array of records.
fn normalize_document(raw: &Value) -> Result<Value> {
    match raw {
        Value::Array(items) => Ok(Value::Array(
            items
                .iter()
                .map(normalize)
                .collect::<std::result::Result<Vec<_>, _>>()?,
        )),
        other => Ok(normalize(other)?),
    }
}
