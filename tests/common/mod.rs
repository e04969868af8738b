#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use license_verify::authority::Transport;
use license_verify::config::Endpoints;
use license_verify::error::TransportError;
use tempfile::TempDir;

pub const SPDX_URL: &str = "http://authorities.test/spdx/licenses.json";
pub const FSF_URL: &str = "http://authorities.test/fsf/license-list.html";
pub const OD_URL: &str = "http://authorities.test/od/od.json";

pub const SPDX_BODY: &str = r#"{
  "licenseListVersion": "3.24",
  "licenses": [
    {"licenseId": "MIT", "name": "MIT License", "isOsiApproved": true},
    {"licenseId": "Apache-2.0", "name": "Apache License 2.0", "isOsiApproved": true},
    {"licenseId": "BSD-3-Clause-Clear", "name": "BSD 3-Clause Clear License", "isOsiApproved": false},
    {"licenseId": "CC-BY-4.0", "name": "Creative Commons Attribution 4.0 International", "isOsiApproved": false},
    {"licenseId": "WTFPL", "name": "Do What The F*ck You Want To Public License", "isOsiApproved": false}
  ]
}"#;

pub const FSF_BODY: &str = r##"<!DOCTYPE html>
<html><head><meta charset="utf-8"><title>Various Licenses</title></head>
<body>
<div class="green"><dl>
<dt><a id="apache2" href="http://directory.fsf.org/wiki/License:Apache2.0">Apache License, Version 2.0</a>
<span class="anchor-reference-id">(<a href="#apache2">#apache2</a>)</span></dt>
<dd><p>This is a free software license.</p></dd>
<dt><a id="clearbsd" href="http://directory.fsf.org/wiki/License:ClearBSD">Clear BSD License</a></dt>
<dd><p>Lax, permissive, non-copyleft.</p></dd>
<dt><a id="Expat" href="http://directory.fsf.org/wiki/License:Expat">Expat License</a></dt>
<dd><p>Sometimes ambiguously referred to as the MIT License.</p></dd>
</dl></div>
<div class="red"><dl>
<dt><a id="NPL">Netscape Public License (NPL)</a></dt>
</dl></div>
</body></html>"##;

pub const OD_BODY: &str = r#"{
  "CC-BY-4.0": {"id": "CC-BY-4.0", "title": "Creative Commons Attribution 4.0"},
  "MIT": {"id": "MIT", "title": "MIT License"}
}"#;

pub fn endpoints() -> Endpoints {
    Endpoints {
        spdx: SPDX_URL.to_string(),
        fsf: FSF_URL.to_string(),
        open_definition: OD_URL.to_string(),
    }
}

/// Serves the fixture bodies and counts requests per URL.
pub struct CountingTransport {
    bodies: HashMap<String, String>,
    calls: std::sync::Mutex<HashMap<String, usize>>,
    total: AtomicUsize,
}

impl CountingTransport {
    pub fn new() -> Self {
        Self::with_bodies(&[(SPDX_URL, SPDX_BODY), (FSF_URL, FSF_BODY), (OD_URL, OD_BODY)])
    }

    pub fn with_bodies(bodies: &[(&str, &str)]) -> Self {
        Self {
            bodies: bodies
                .iter()
                .map(|(url, body)| (url.to_string(), body.to_string()))
                .collect(),
            calls: std::sync::Mutex::new(HashMap::new()),
            total: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

impl Transport for CountingTransport {
    async fn get(&self, url: &str) -> Result<String, TransportError> {
        self.total.fetch_add(1, Ordering::SeqCst);
        *self.calls.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| TransportError::Request {
                url: url.to_string(),
                message: "connection refused".to_string(),
            })
    }
}

/// A small site directory with licenses and schema data.
pub struct FixtureSite {
    _tmp: TempDir,
    pub root: PathBuf,
}

impl FixtureSite {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path().join("site");

        write(
            &root,
            "_data/rules.yml",
            r#"permissions:
  - tag: commercial-use
    label: Commercial use
  - tag: modifications
    label: Modification
conditions:
  - tag: include-copyright
    label: License and copyright notice
limitations:
  - tag: liability
    label: Liability
  - tag: warranty
    label: Warranty
"#,
        );
        write(
            &root,
            "_data/fields.yml",
            "- name: fullname\n- name: year\n",
        );
        write(
            &root,
            "_data/meta.yml",
            r#"- name: featured
  description: Whether the license is featured
- name: osi-approved
- name: fsf-approved
- name: od-approved
"#,
        );

        Self { _tmp: tmp, root }
    }

    pub fn license(&self, basename: &str, front_matter: &str) -> &Self {
        write(
            &self.root,
            &format!("_licenses/{}.txt", basename),
            &format!("---\n{}---\n\nLicense text.\n", front_matter),
        );
        self
    }

    pub fn path(&self) -> &Path {
        &self.root
    }
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().expect("fixture path has a parent"))
        .expect("create fixture dir");
    std::fs::write(path, content).expect("write fixture");
}
