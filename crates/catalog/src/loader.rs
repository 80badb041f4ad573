use crate::{
    normalize::{TermCatalog, normalize},
    raw::RawTerm,
};
use futures::future::join_all;
use log::info;
use models::term::Term;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use reqwest::Client;
use std::{
    collections::{BTreeMap, BTreeSet},
    convert::Infallible,
    env,
    fmt::{Display, Formatter, Result as FmtResult},
    path::PathBuf,
    str::FromStr,
};

/// Environment variable naming the data directory or base URL
pub const DATA_SOURCE_VAR: &str = "CATALOG_DATA_SOURCE";

/// Data location used when [`DATA_SOURCE_VAR`] is unset
pub const DEFAULT_DATA_SOURCE: &str = "data";

/// Where the per-term JSON files live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// A local directory holding the term files
    Directory(PathBuf),
    /// An `http(s)` base URL the term files are served under
    Remote(String),
}

impl DataSource {
    /// Reads the data source from [`DATA_SOURCE_VAR`], falling back to
    /// [`DEFAULT_DATA_SOURCE`]
    pub fn from_env() -> Self {
        env::var(DATA_SOURCE_VAR)
            .map(Self::from)
            .unwrap_or_else(|_| Self::from(DEFAULT_DATA_SOURCE))
    }

    /// Location of a term's file, as a path or URL
    pub fn location(&self, term: Term) -> String {
        match self {
            Self::Directory(dir) => dir.join(term.file_name()).display().to_string(),
            Self::Remote(base) => format!("{}/{}", base.trim_end_matches('/'), term.file_name()),
        }
    }
}

impl FromStr for DataSource {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(Self::Remote(s.to_owned()))
        } else {
            Ok(Self::Directory(PathBuf::from(s)))
        }
    }
}

impl From<&str> for DataSource {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(source) => source,
            Err(never) => match never {},
        }
    }
}

impl From<String> for DataSource {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl Display for DataSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Directory(dir) => write!(f, "{}", dir.display()),
            Self::Remote(base) => write!(f, "{base}"),
        }
    }
}

/// A term's data could not be retrieved or decoded
#[derive(Debug)]
pub enum LoadError {
    Io { term: Term, source: std::io::Error },
    Http { term: Term, source: reqwest::Error },
    Decode { term: Term, source: serde_json::Error },
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Io { term, source } => write!(f, "Failed to read {term} data: {source}"),
            Self::Http { term, source } => write!(f, "Failed to download {term} data: {source}"),
            Self::Decode { term, source } => write!(f, "Failed to decode {term} data: {source}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Http { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
        }
    }
}

/// Every term's courses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    terms: BTreeMap<Term, TermCatalog>,
}

static EMPTY_TERM: TermCatalog = TermCatalog {
    courses: Vec::new(),
    subjects: BTreeSet::new(),
    departments: BTreeMap::new(),
};

impl Catalog {
    pub fn new(terms: impl IntoIterator<Item = (Term, TermCatalog)>) -> Self {
        Self {
            terms: terms.into_iter().collect(),
        }
    }

    /// A term's courses; a term that was never loaded has none
    pub fn term(&self, term: Term) -> &TermCatalog {
        self.terms.get(&term).unwrap_or(&EMPTY_TERM)
    }

    /// Subject codes offered in any term
    pub fn subjects(&self) -> BTreeSet<&str> {
        self.terms
            .values()
            .flat_map(|catalog| catalog.subjects.iter().map(String::as_str))
            .collect()
    }
}

/// Reads the raw bytes of one term's file
async fn fetch_term(
    client: &Client,
    source: &DataSource,
    term: Term,
) -> Result<Vec<u8>, LoadError> {
    match source {
        DataSource::Directory(dir) => tokio::fs::read(dir.join(term.file_name()))
            .await
            .map_err(|source| LoadError::Io { term, source }),
        DataSource::Remote(_) => {
            let http = |source| LoadError::Http { term, source };
            let response = client
                .get(source.location(term))
                .send()
                .await
                .and_then(|response| response.error_for_status())
                .map_err(http)?;

            let body = response.bytes().await.map_err(http)?;
            Ok(body.to_vec())
        }
    }
}

/// Loads and normalizes every term with a default HTTP client
pub async fn load_all_terms(source: &DataSource) -> Result<Catalog, LoadError> {
    load_all_terms_with(&Client::new(), source).await
}

/// Loads and normalizes every term
///
/// # Arguments
/// * `client` - HTTP client used when `source` is remote
/// * `source` - Where the term files live
///
/// # Returns
/// The full catalog, or the first term that failed to load. No partial
/// catalog is returned.
pub async fn load_all_terms_with(
    client: &Client,
    source: &DataSource,
) -> Result<Catalog, LoadError> {
    info!("Loading course data from {source}");

    // Fetch every term concurrently
    let futures = Term::all()
        .into_iter()
        .map(|term| async move { (term, fetch_term(client, source, term).await) });
    let downloaded = join_all(futures)
        .await
        .into_iter()
        .map(|(term, bytes)| bytes.map(|bytes| (term, bytes)))
        .collect::<Result<Vec<_>, _>>()?;

    // Decode and normalize in parallel
    let terms = downloaded
        .into_par_iter()
        .map(|(term, bytes)| {
            let raw: RawTerm = serde_json::from_slice(&bytes)
                .map_err(|source| LoadError::Decode { term, source })?;
            info!("Normalizing {term} courses");

            Ok((term, normalize(raw)))
        })
        .collect::<Result<Vec<_>, LoadError>>()?;

    Ok(Catalog::new(terms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::{error::Error, fs, path::Path};
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    fn term_document(term: Term, subject: &str) -> String {
        json!([[
            {
                "course": {"subjectCode": subject, "courseNum": "10", "title": term.to_string()},
                "meeting": [],
            },
            {"course": {"courseNum": "99"}},
        ]])
        .to_string()
    }

    fn write_term(dir: &Path, term: Term, subject: &str) {
        fs::write(dir.join(term.file_name()), term_document(term, subject)).unwrap();
    }

    /// Serves the given files over HTTP on a local port and returns the base URL.
    /// Any other path is a 404.
    async fn serve(files: Vec<(&'static str, String)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let files = files.clone();
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut buf = [0; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match stream.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => request.extend_from_slice(&buf[..n]),
                        }
                    }

                    let request = String::from_utf8_lossy(&request);
                    let path = request
                        .split_whitespace()
                        .nth(1)
                        .unwrap_or_default()
                        .trim_start_matches('/');

                    let response = match files.iter().find(|(name, _)| *name == path) {
                        Some((_, body)) => format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
                             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                            body.len()
                        ),
                        None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\
                                 Connection: close\r\n\r\n"
                            .to_owned(),
                    };
                    let _ = stream.write_all(response.as_bytes()).await;
                });
            }
        });

        base
    }

    /// A client that never routes local test traffic through a proxy
    fn local_client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("catalog-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_data_source_from_str() {
        assert_eq!(
            DataSource::from("https://example.com/data/"),
            DataSource::Remote("https://example.com/data/".to_owned())
        );
        assert_eq!(
            DataSource::from(" data "),
            DataSource::Directory(PathBuf::from("data"))
        );
    }

    #[test]
    fn test_data_source_location() {
        let remote = DataSource::from("http://localhost:8000/");
        assert_eq!(
            remote.location(Term::Fall),
            "http://localhost:8000/ucd_classes_fall_2025.json"
        );

        let dir = DataSource::from("data");
        assert_eq!(
            dir.location(Term::Spring),
            Path::new("data")
                .join("ucd_classes_spring_2025.json")
                .display()
                .to_string()
        );
    }

    #[tokio::test]
    async fn test_load_all_terms() {
        let dir = scratch_dir("load");
        write_term(&dir, Term::Fall, "CSE");
        write_term(&dir, Term::Winter, "MAT");
        write_term(&dir, Term::Spring, "CSE");

        let catalog = load_all_terms(&DataSource::Directory(dir.clone()))
            .await
            .unwrap();

        let fall = catalog.term(Term::Fall);
        assert_eq!(fall.courses.len(), 1);
        assert_eq!(fall.courses[0].title, "fall");
        assert_eq!(catalog.term(Term::Winter).courses[0].code, "MAT");
        assert_eq!(
            catalog.subjects().into_iter().collect::<Vec<_>>(),
            ["CSE", "MAT"]
        );

        fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_missing_term_fails_load() {
        let dir = scratch_dir("missing");
        write_term(&dir, Term::Fall, "CSE");
        write_term(&dir, Term::Spring, "CSE");

        let err = load_all_terms(&DataSource::Directory(dir.clone()))
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { term: Term::Winter, .. }));
        assert!(err.to_string().starts_with("Failed to read winter data"));

        fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_malformed_term_fails_load() {
        let dir = scratch_dir("malformed");
        write_term(&dir, Term::Fall, "CSE");
        write_term(&dir, Term::Winter, "CSE");
        fs::write(dir.join(Term::Spring.file_name()), "{\"not\": \"a list\"}").unwrap();

        let err = load_all_terms(&DataSource::Directory(dir.clone()))
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Decode { term: Term::Spring, .. }));

        fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_load_all_terms_over_http() {
        let base = serve(vec![
            (Term::Fall.file_name(), term_document(Term::Fall, "CSE")),
            (Term::Winter.file_name(), term_document(Term::Winter, "MAT")),
            (Term::Spring.file_name(), term_document(Term::Spring, "PHY")),
        ])
        .await;

        let source = DataSource::from(format!("{base}/"));
        let catalog = load_all_terms_with(&local_client(), &source)
            .await
            .unwrap();

        assert_eq!(catalog.term(Term::Spring).courses[0].code, "PHY");
        assert_eq!(catalog.term(Term::Winter).courses[0].title, "winter");
        assert_eq!(
            catalog.subjects().into_iter().collect::<Vec<_>>(),
            ["CSE", "MAT", "PHY"]
        );
    }

    #[tokio::test]
    async fn test_http_error_status_fails_load() {
        let base = serve(vec![
            (Term::Fall.file_name(), term_document(Term::Fall, "CSE")),
            (Term::Winter.file_name(), term_document(Term::Winter, "CSE")),
        ])
        .await;

        let err = load_all_terms_with(&local_client(), &DataSource::from(base))
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Http { term: Term::Spring, .. }));
        assert!(err.to_string().starts_with("Failed to download spring data"));
        assert!(err.source().is_some());
    }

    #[tokio::test]
    async fn test_unreachable_server_fails_load() {
        // Bind and drop a listener to find a port nothing is listening on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = DataSource::from(format!("http://{addr}"));
        let err = load_all_terms_with(&local_client(), &source)
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Http { term: Term::Fall, .. }));
    }

    #[test]
    fn test_unloaded_term_is_empty() {
        let catalog = Catalog::default();
        assert!(catalog.term(Term::Fall).courses.is_empty());
        assert!(catalog.subjects().is_empty());
    }
}
