use anyhow::{Context, Result, bail};
use cachecache::{Bundle, Cache, PropertyListCache};
use plist::{Dictionary, Value};
use std::path::PathBuf;

#[derive(Clone, Copy)]
pub struct Config {
    pub verbose: bool,
}

/// Identifies one cache file from the command line
pub struct Target {
    pub cache_type: String,
    pub bundle: String,
    pub cache_root: Option<PathBuf>,
}

impl Target {
    fn open(&self) -> PropertyListCache<Value> {
        let mut bundle = Bundle::new(&self.bundle);
        if let Some(root) = &self.cache_root {
            bundle = bundle.with_cache_root(root);
        }
        PropertyListCache::new(&self.cache_type, &bundle)
    }
}

pub fn persist(target: &Target, json: &str, config: &Config) -> Result<()> {
    let parsed: serde_json::Value =
        serde_json::from_str(json).context("Payload is not valid JSON")?;
    let value = json_to_plist(&parsed)?;

    let mut cache = target.open();
    let Some(location) = cache.location().map(|p| p.to_path_buf()) else {
        bail!("No cache location for {} in bundle {}", target.cache_type, target.bundle);
    };

    cache.persist_identity(Some(value.clone()));
    if cache.retrieve_identity().as_ref() != Some(&value) {
        bail!("Failed to persist {} payload to {}", target.cache_type, location.display());
    }

    if config.verbose {
        println!("Wrote {}", location.display());
    }
    println!("✓ Persisted {} payload", target.cache_type);
    Ok(())
}

pub fn retrieve(target: &Target, config: &Config) -> Result<()> {
    let cache = target.open();

    match cache.retrieve_identity() {
        Some(value) => {
            if config.verbose {
                if let Some(location) = cache.location() {
                    println!("Read {}", location.display());
                }
            }
            let rendered =
                serde_json::to_string_pretty(&value).context("Failed to render payload as JSON")?;
            println!("{}", rendered);
        }
        None => println!("No {} payload cached", target.cache_type),
    }
    Ok(())
}

pub fn locate(target: &Target) -> Result<()> {
    let cache = target.open();
    let location = cache
        .location()
        .with_context(|| format!("No cache location for {} in bundle {}", target.cache_type, target.bundle))?;
    println!("{}", location.display());
    Ok(())
}

/// Maps JSON onto a property list tree. `null` has no counterpart.
fn json_to_plist(json: &serde_json::Value) -> Result<Value> {
    use serde_json::Value as Json;

    Ok(match json {
        Json::Null => bail!("null cannot be stored in a property list"),
        Json::Bool(b) => Value::Boolean(*b),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Integer(u.into())
            } else {
                Value::Real(n.as_f64().context("Unrepresentable number")?)
            }
        }
        Json::String(s) => Value::String(s.clone()),
        Json::Array(items) => Value::Array(items.iter().map(json_to_plist).collect::<Result<_>>()?),
        Json::Object(map) => {
            let mut dict = Dictionary::new();
            for (key, item) in map {
                dict.insert(key.clone(), json_to_plist(item)?);
            }
            Value::Dictionary(dict)
        }
    })
}
