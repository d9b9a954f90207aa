use std::env;
use std::fs;
use std::path::Path;

pub fn insta_snapshot<F: FnOnce()>(f: F) {
    let mut settings = insta::Settings::clone_current();
    let snapshot_path = env::current_dir().unwrap().join("./test/snapshots");
    settings.set_snapshot_path(snapshot_path);
    settings.bind(f);
}

/// Writes a small fake PDF payload to `dir/name` and returns its path as a
/// string.
pub fn pdf_fixture(dir: &Path, name: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\n%%EOF\n").unwrap();
    return path.to_string_lossy().to_string();
}

pub fn chunks_fixture() -> &'static str {
    return r#"
[
  {
    "id": "c0a1",
    "content": "This Agreement shall commence on the Effective Date and continue for a period of twelve (12) months.",
    "metadata": { "source": "contract.pdf", "page": 0 }
  },
  {
    "id": "c0a2",
    "content": "Either party may terminate this Agreement with thirty (30) days written notice.",
    "metadata": { "source": "contract.pdf", "page": 3 }
  },
  {
    "id": "m1",
    "content": "Press and hold the power button for five seconds to reset the device.",
    "metadata": { "source": "manual.pdf" }
  }
]
"#
    .trim();
}

pub fn system_status_fixture() -> &'static str {
    return r#"
{
  "embedding_model": "text-embedding-3-small",
  "embedding_dimensions": 1536,
  "llm_provider": "openai",
  "llm_model": "gpt-4o-mini",
  "os": "Linux",
  "cpu_count": 8,
  "cpu_percent": 12.5,
  "ram_total_gb": 15.52,
  "ram_used_gb": 6.1,
  "ram_percent": 39.3,
  "container": "Docker",
  "backend": "FastAPI + Uvicorn"
}
"#
    .trim();
}
