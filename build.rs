use std::env;
use std::io::Write;
use std::path::Path;

use serde::Deserialize;

/*
 * Intermediate struct, one per geostationary vehicle
 * described in data/sbas.json
 */
#[derive(Deserialize)]
struct SBASDBEntry<'a> {
    pub subtype: &'a str,
    pub svid: u16,
    pub id: &'a str,
}

fn build_sbas_helper() {
    let outdir = env::var("OUT_DIR").unwrap();
    let path = Path::new(&outdir).join("sbas.rs");
    let mut fd = std::fs::File::create(path).unwrap();

    // read descriptor: parse and dump into a static array
    let db_content = std::fs::read_to_string("data/sbas.json").unwrap();

    let sbas_db: Vec<SBASDBEntry> = serde_json::from_str(&db_content).unwrap();

    let content = "#[derive(Debug)]
pub(crate) struct SBASHelper<'a> {
    pub(crate) subtype: &'a str,
    pub(crate) svid: u16,
    pub(crate) id: &'a str,
}

lazy_static! {
    pub(crate) static ref SBAS_VEHICLES: Vec<SBASHelper<'static>> = vec![
\n";

    fd.write_all(content.as_bytes()).unwrap();

    for e in sbas_db {
        fd.write_all(
            format!(
                "SBASHelper {{
                subtype: \"{}\",
                svid: {},
                id: \"{}\",
            }},",
                e.subtype, e.svid, e.id,
            )
            .as_bytes(),
        )
        .unwrap()
    }

    fd.write_all("    ];".as_bytes()).unwrap();
    fd.write_all("}\n".as_bytes()).unwrap();
}

fn main() {
    println!("cargo:rerun-if-changed=data/sbas.json");
    build_sbas_helper();
}
