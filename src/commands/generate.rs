//! Generate the static data files

use anyhow::{Context, Result};
use notify::Watcher;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::content::RouteParams;
use crate::query::summaries;
use crate::sitemap::encode_segment;
use crate::Quill;

/// Files produced by one build, held in memory until every post has rendered
#[derive(Debug, Default)]
pub struct BuildOutput {
    files: Vec<(PathBuf, String)>,
}

impl BuildOutput {
    fn push_json<T: Serialize>(&mut self, path: PathBuf, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)
            .with_context(|| format!("serializing {}", path.display()))?;
        self.files.push((path, json));
        Ok(())
    }

    /// Relative paths of every file, in write order
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|(path, _)| path.as_path())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn write_to(&self, root: &Path) -> Result<()> {
        for (relative, content) in &self.files {
            let path = root.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
            tracing::debug!("Wrote {:?}", path);
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct StaticPaths {
    posts: Vec<RouteParams>,
    categories: Vec<RouteParams>,
    tags: Vec<RouteParams>,
}

/// Rebuild everything under the public directory
pub fn run(quill: &Quill) -> Result<()> {
    let start = Instant::now();

    let output = build(quill)?;
    output.write_to(&quill.public_dir)?;

    tracing::info!(
        "Generated {} files in {:.2}s",
        output.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Index and render every post without touching the public directory.
/// The first content error aborts the build.
pub fn build(quill: &Quill) -> Result<BuildOutput> {
    let config = &quill.config;
    let query = quill.query();
    let index = query.index()?;
    tracing::info!(
        "Loaded {} posts, {} categories, {} tags",
        index.posts().len(),
        index.categories().len(),
        index.tags().len()
    );

    let mut output = BuildOutput::default();

    output.push_json(
        PathBuf::from("index.json"),
        &summaries(&index.sorted_by_date_desc()),
    )?;

    for post in index.posts() {
        let rendered = query.render(post.clone());
        output.push_json(json_path(&config.post_dir, &post.id), &rendered)?;
    }

    for label in index.category_labels() {
        let posts = index.posts_in_category(&label);
        output.push_json(json_path(&config.category_dir, &label), &summaries(&posts))?;
    }

    for label in index.tag_labels() {
        let posts = index.posts_with_tag(&label);
        output.push_json(json_path(&config.tag_dir, &label), &summaries(&posts))?;
    }

    let paths = StaticPaths {
        posts: index.ids().into_iter().map(RouteParams::new).collect(),
        categories: index
            .category_labels()
            .into_iter()
            .map(RouteParams::new)
            .collect(),
        tags: index.tag_labels().into_iter().map(RouteParams::new).collect(),
    };
    output.push_json(PathBuf::from("paths.json"), &paths)?;

    let sitemap = quill
        .sitemap()
        .generate(&index.ids(), &index.category_labels());
    output.files.push((PathBuf::from("sitemap.xml"), sitemap));

    Ok(output)
}

fn json_path(dir: &str, id: &str) -> PathBuf {
    Path::new(dir.trim_matches('/')).join(format!("{}.json", encode_segment(id)))
}

/// Watch the content directory and `_config.yml`, rebuilding on change
pub fn watch(quill: &Quill) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    if quill.source_dir.exists() {
        watcher.watch(&quill.source_dir, notify::RecursiveMode::NonRecursive)?;
    } else {
        tracing::warn!("Content directory {:?} does not exist", quill.source_dir);
    }

    let config_path = quill.base_dir.join("_config.yml");
    if config_path.exists() {
        watcher.watch(&config_path, notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut debounce = Debounce::new(DEBOUNCE);

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => debounce.record(),
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }

        if debounce.take_ready(Instant::now()) {
            tracing::info!("File changed, regenerating...");
            // Reload so config edits take effect
            let result = Quill::new(&quill.base_dir).and_then(|quill| run(&quill));
            if let Err(e) = result {
                tracing::error!("Generation failed: {:#}", e);
            }
            debounce.rebuilt(Instant::now());
        }
    }

    Ok(())
}

/// Minimum time between two rebuilds
const DEBOUNCE: Duration = Duration::from_millis(500);

/// Tracks changes seen since the last rebuild. Changes arriving inside the
/// window stay pending and trigger one rebuild once it closes.
#[derive(Debug)]
struct Debounce {
    window: Duration,
    last_rebuild: Option<Instant>,
    pending: bool,
}

impl Debounce {
    fn new(window: Duration) -> Self {
        Self {
            window,
            last_rebuild: None,
            pending: false,
        }
    }

    fn record(&mut self) {
        self.pending = true;
    }

    /// Whether a rebuild is due at `now`; clears the pending flag if so
    fn take_ready(&mut self, now: Instant) -> bool {
        let window_closed = self
            .last_rebuild
            .map_or(true, |last| now.saturating_duration_since(last) >= self.window);
        if self.pending && window_closed {
            self.pending = false;
            true
        } else {
            false
        }
    }

    fn rebuilt(&mut self, at: Instant) {
        self.last_rebuild = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn site() -> (TempDir, Quill) {
        let dir = tempfile::tempdir().unwrap();
        let posts = dir.path().join("posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(
            posts.join("a.md"),
            "---\ntitle: A\ndate: 2021-01-01\ncategories: [Tech]\ntags: [rust]\n---\n# A\n",
        )
        .unwrap();
        fs::write(
            posts.join("b.md"),
            "---\ntitle: B\ndate: 2022-01-01\n---\nbody\n",
        )
        .unwrap();
        let quill = Quill::new(dir.path()).unwrap();
        (dir, quill)
    }

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_output_layout() {
        let (_dir, quill) = site();
        let output = build(&quill).unwrap();
        let paths: Vec<_> = output.paths().map(|p| p.to_path_buf()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("index.json"),
                PathBuf::from("posts/a.json"),
                PathBuf::from("posts/b.json"),
                PathBuf::from("categories/uncategorized.json"),
                PathBuf::from("categories/tech.json"),
                PathBuf::from("tags/rust.json"),
                PathBuf::from("paths.json"),
                PathBuf::from("sitemap.xml"),
            ]
        );
    }

    #[test]
    fn test_run_writes_files() {
        let (_dir, quill) = site();
        run(&quill).unwrap();

        let index = read_json(&quill.public_dir.join("index.json"));
        assert_eq!(index[0]["id"], "b");
        assert_eq!(index[1]["id"], "a");

        let post = read_json(&quill.public_dir.join("posts/a.json"));
        assert_eq!(post["title"], "A");
        assert!(post["contentHtml"].as_str().unwrap().contains(r#"<h1 id="a">"#));

        let uncategorized = read_json(&quill.public_dir.join("categories/uncategorized.json"));
        assert_eq!(uncategorized[0]["id"], "b");
        assert_eq!(uncategorized[0]["categories"][0], "Uncategorized");

        let paths = read_json(&quill.public_dir.join("paths.json"));
        assert_eq!(paths["categories"][1]["params"]["id"], "tech");
        assert_eq!(paths["tags"][0]["params"]["id"], "rust");

        let sitemap = fs::read_to_string(quill.public_dir.join("sitemap.xml")).unwrap();
        assert_eq!(sitemap.matches("<url>").count(), 5);
    }

    #[test]
    fn test_malformed_post_aborts_build() {
        let (dir, quill) = site();
        fs::write(
            dir.path().join("posts/c.md"),
            "---\ntitle: [unclosed\ndate: 2020-01-01\n---\n",
        )
        .unwrap();

        assert!(run(&quill).is_err());
        assert!(!quill.public_dir.exists());
    }

    #[test]
    fn test_labels_are_safe_file_names() {
        assert_eq!(json_path("tags", "c/c++"), PathBuf::from("tags/c%2Fc++.json"));
        assert_eq!(json_path("/posts/", "x"), PathBuf::from("posts/x.json"));
    }

    #[test]
    fn test_debounce_rebuilds_once_per_burst() {
        let start = Instant::now();
        let mut debounce = Debounce::new(DEBOUNCE);
        assert!(!debounce.take_ready(start));

        debounce.record();
        debounce.record();
        assert!(debounce.take_ready(start));
        debounce.rebuilt(start);
        assert!(!debounce.take_ready(start + Duration::from_secs(1)));
    }

    #[test]
    fn test_change_inside_window_is_rebuilt_later() {
        let start = Instant::now();
        let mut debounce = Debounce::new(DEBOUNCE);
        debounce.rebuilt(start);

        debounce.record();
        assert!(!debounce.take_ready(start + Duration::from_millis(100)));
        assert!(!debounce.take_ready(start + Duration::from_millis(400)));
        assert!(debounce.take_ready(start + Duration::from_millis(600)));
        assert!(!debounce.take_ready(start + Duration::from_millis(700)));
    }
}
