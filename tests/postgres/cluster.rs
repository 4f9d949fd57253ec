//! Cluster lifecycle helpers for `PostgreSQL` integration tests.
//!
//! One embedded cluster is bootstrapped per test process and shared by
//! every test. Each test creates its own database from a pre-migrated
//! template, so tests stay isolated without paying the migration cost
//! per test.

use diesel::prelude::*;
use pg_embedded_setup_unpriv::worker_process_test_api::{
    WorkerOperation, WorkerRequest, WorkerRequestArgs, run as run_worker,
};
use pg_embedded_setup_unpriv::{
    ExecutionPrivileges, TestBootstrapSettings, bootstrap_for_tests, detect_execution_privileges,
};
use postgresql_embedded::{PostgreSQL, Settings, Status};
use rstest::fixture;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::net::TcpListener;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;
use tokio::runtime::Runtime;

/// Boxed error type shared by the integration test helpers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared `PostgreSQL` cluster handle for integration tests.
pub type PostgresCluster = &'static ManagedCluster;

static SHARED_CLUSTER: OnceLock<Result<ManagedCluster, String>> = OnceLock::new();
static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// Lightweight connection wrapper for building database URLs.
#[derive(Debug, Clone)]
pub struct ClusterConnection {
    settings: Settings,
}

impl ClusterConnection {
    /// Returns the connection URL for the named database.
    #[must_use]
    pub fn database_url(&self, database: &str) -> String {
        self.settings.url(database)
    }
}

/// Managed embedded `PostgreSQL` cluster for test lifecycles.
pub struct ManagedCluster {
    bootstrap: TestBootstrapSettings,
    env_vars: Vec<(String, Option<String>)>,
    runtime: Option<Runtime>,
    postgres: Option<PostgreSQL>,
}

impl ManagedCluster {
    fn new() -> Result<Self, BoxError> {
        let worker_env = worker_env_changes()?;
        let worker_guard = EnvVarGuard::set_many(&worker_env);
        let mut bootstrap = bootstrap_for_tests().map_err(|err| Box::new(err) as BoxError)?;
        drop(worker_guard);
        sync_password_from_file(&mut bootstrap.settings)?;
        let env_vars = bootstrap.environment.to_env();
        let mut cluster = Self {
            bootstrap,
            env_vars,
            runtime: None,
            postgres: None,
        };
        cluster.start()?;
        Ok(cluster)
    }

    /// Returns a handle for building connection URLs into this cluster.
    #[must_use]
    pub fn connection(&self) -> ClusterConnection {
        ClusterConnection {
            settings: self.bootstrap.settings.clone(),
        }
    }

    /// Creates a database from a template, dropped again when the
    /// returned handle goes out of scope.
    ///
    /// # Errors
    ///
    /// Returns an error when the admin connection or the `CREATE
    /// DATABASE` statement fails.
    pub async fn temporary_database_from_template(
        &'static self,
        db_name: &str,
        template: &str,
    ) -> Result<TemporaryDatabase, BoxError> {
        let name = db_name.to_owned();
        let template_name = template.to_owned();
        let cluster: PostgresCluster = self;
        tokio::task::spawn_blocking(move || {
            cluster.create_database_from_template(&name, &template_name)?;
            let url = cluster.connection().database_url(&name);
            Ok(TemporaryDatabase { cluster, name, url })
        })
        .await
        .map_err(|err| Box::new(err) as BoxError)?
    }

    /// Creates the template database and migrates it exactly once.
    ///
    /// # Errors
    ///
    /// Returns an error when template creation or migration fails; a
    /// half-migrated template is dropped before the error propagates.
    pub async fn ensure_template_exists<F>(
        &'static self,
        template: &str,
        migrate: F,
    ) -> Result<(), BoxError>
    where
        F: FnOnce(&str) -> Result<(), BoxError> + Send + 'static,
    {
        let template_name = template.to_owned();
        let cluster: PostgresCluster = self;
        tokio::task::spawn_blocking(move || {
            let lock = TEMPLATE_LOCK.get_or_init(|| Mutex::new(()));
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

            if cluster.database_exists(&template_name)? {
                return Ok(());
            }

            cluster.create_database(&template_name)?;
            if let Err(err) = migrate(&template_name) {
                cluster.drop_database(&template_name)?;
                return Err(err);
            }
            Ok(())
        })
        .await
        .map_err(|err| Box::new(err) as BoxError)?
    }

    fn create_database_from_template(
        &self,
        db_name: &str,
        template: &str,
    ) -> Result<(), BoxError> {
        let sql = format!(
            "CREATE DATABASE {} TEMPLATE {}",
            quote_identifier(db_name),
            quote_identifier(template),
        );
        self.execute_admin_sql(&sql)
    }

    fn drop_database(&self, db_name: &str) -> Result<(), BoxError> {
        // FORCE disconnects stragglers so teardown cannot wedge on a
        // connection the pool has not closed yet.
        let sql = format!(
            "DROP DATABASE {} WITH (FORCE)",
            quote_identifier(db_name)
        );
        self.execute_admin_sql(&sql)
    }

    fn start(&mut self) -> Result<(), BoxError> {
        match self.bootstrap.privileges {
            ExecutionPrivileges::Root => self.start_via_worker(),
            ExecutionPrivileges::Unprivileged => self.start_in_process(),
        }
    }

    fn start_in_process(&mut self) -> Result<(), BoxError> {
        let runtime = bootstrap_runtime()?;
        let env_guard = EnvVarGuard::set_many(&env_vars_to_os(&self.env_vars));
        let mut postgres = PostgreSQL::new(self.bootstrap.settings.clone());
        runtime.block_on(async {
            postgres
                .setup()
                .await
                .map_err(|err| Box::new(err) as BoxError)?;
            if !matches!(postgres.status(), Status::Started) {
                postgres
                    .start()
                    .await
                    .map_err(|err| Box::new(err) as BoxError)?;
            }
            Ok::<(), BoxError>(())
        })?;
        drop(env_guard);
        self.bootstrap.settings = postgres.settings().clone();
        sync_port_from_pid(&mut self.bootstrap.settings)?;
        self.runtime = Some(runtime);
        self.postgres = Some(postgres);
        Ok(())
    }

    fn start_via_worker(&mut self) -> Result<(), BoxError> {
        self.run_worker_operation(WorkerOperation::Setup, self.bootstrap.setup_timeout)?;
        self.run_worker_operation(WorkerOperation::Start, self.bootstrap.start_timeout)?;
        sync_port_from_pid(&mut self.bootstrap.settings)?;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), BoxError> {
        let Some(postgres) = self.postgres.take() else {
            if matches!(self.bootstrap.privileges, ExecutionPrivileges::Root) {
                self.run_worker_operation(WorkerOperation::Stop, self.bootstrap.shutdown_timeout)?;
            }
            return Ok(());
        };

        let Some(runtime) = &self.runtime else {
            return Ok(());
        };

        runtime.block_on(async {
            postgres
                .stop()
                .await
                .map_err(|err| Box::new(err) as BoxError)
        })?;
        Ok(())
    }

    fn run_worker_operation(
        &self,
        operation: WorkerOperation,
        timeout: Duration,
    ) -> Result<(), BoxError> {
        let worker = self.bootstrap.worker_binary.as_ref().ok_or_else(|| {
            Box::new(std::io::Error::new(
                ErrorKind::NotFound,
                "PG_EMBEDDED_WORKER is not set for worker operation",
            )) as BoxError
        })?;
        let args = WorkerRequestArgs {
            worker: worker.as_path(),
            settings: &self.bootstrap.settings,
            env_vars: &self.env_vars,
            operation,
            timeout,
        };
        run_worker(&WorkerRequest::new(args)).map_err(|err| Box::new(err) as BoxError)?;
        Ok(())
    }

    fn admin_connection(&self) -> Result<PgConnection, BoxError> {
        let url = self.connection().database_url("postgres");
        PgConnection::establish(&url).map_err(|err| Box::new(err) as BoxError)
    }

    fn execute_admin_sql(&self, sql: &str) -> Result<(), BoxError> {
        let mut conn = self.admin_connection()?;
        diesel::sql_query(sql)
            .execute(&mut conn)
            .map_err(|err| Box::new(err) as BoxError)?;
        Ok(())
    }

    fn create_database(&self, db_name: &str) -> Result<(), BoxError> {
        let sql = format!("CREATE DATABASE {}", quote_identifier(db_name));
        self.execute_admin_sql(&sql)
    }

    fn database_exists(&self, db_name: &str) -> Result<bool, BoxError> {
        #[derive(diesel::QueryableByName)]
        struct ExistsRow {
            #[diesel(sql_type = diesel::sql_types::Bool)]
            exists: bool,
        }

        let mut conn = self.admin_connection()?;
        let row = diesel::sql_query(
            "SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1) AS exists",
        )
        .bind::<diesel::sql_types::Text, _>(db_name)
        .get_result::<ExistsRow>(&mut conn)
        .map_err(|err| Box::new(err) as BoxError)?;
        Ok(row.exists)
    }
}

impl Drop for ManagedCluster {
    fn drop(&mut self) {
        drop(self.stop());
    }
}

/// Database created from a template, dropped on release.
pub struct TemporaryDatabase {
    cluster: PostgresCluster,
    name: String,
    url: String,
}

impl TemporaryDatabase {
    /// Returns the connection URL for this database.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        // Best effort; the cluster itself is torn down with the process.
        drop(self.cluster.drop_database(&self.name));
    }
}

/// Provides the shared `PostgreSQL` cluster, bootstrapping it on first use.
#[fixture]
pub fn postgres_cluster() -> Result<PostgresCluster, BoxError> {
    let shared = SHARED_CLUSTER.get_or_init(bootstrap_shared_cluster);
    match shared {
        Ok(cluster) => Ok(cluster),
        Err(message) => Err(Box::new(std::io::Error::other(message.clone()))),
    }
}

fn bootstrap_shared_cluster() -> Result<ManagedCluster, String> {
    // The fixture is reached from inside a tokio runtime, and the
    // in-process start path needs its own block_on, so bootstrap runs
    // on a dedicated thread.
    let handle = std::thread::Builder::new()
        .name("pg-bootstrap".to_owned())
        .spawn(|| ManagedCluster::new().map_err(|err| err.to_string()))
        .map_err(|err| err.to_string())?;
    handle
        .join()
        .map_err(|_| "postgres bootstrap thread panicked".to_owned())?
}

fn bootstrap_runtime() -> Result<Runtime, BoxError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| Box::new(err) as BoxError)
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn env_vars_to_os(env_vars: &[(String, Option<String>)]) -> Vec<(OsString, Option<OsString>)> {
    env_vars
        .iter()
        .map(|(key, value)| (OsString::from(key), value.as_ref().map(OsString::from)))
        .collect()
}

fn sync_password_from_file(settings: &mut Settings) -> Result<(), BoxError> {
    match std::fs::read_to_string(&settings.password_file) {
        Ok(contents) => {
            let password = contents.trim_end();
            if !password.is_empty() {
                password.clone_into(&mut settings.password);
            }
            Ok(())
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(Box::new(err) as BoxError),
    }
}

fn sync_port_from_pid(settings: &mut Settings) -> Result<(), BoxError> {
    let pid_path = settings.data_dir.join("postmaster.pid");
    let contents = match std::fs::read_to_string(&pid_path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(Box::new(err) as BoxError),
    };

    // Line 4 of postmaster.pid carries the port the server actually bound.
    let port_line = contents.lines().nth(3).map(str::trim);
    let Some(port_value) = port_line else {
        return Ok(());
    };
    let Ok(port) = port_value.parse::<u16>() else {
        return Ok(());
    };
    settings.port = port;
    Ok(())
}

fn worker_env_changes() -> Result<Vec<(OsString, Option<OsString>)>, BoxError> {
    let port_override = resolve_pg_port()?;

    let mut changes = Vec::new();
    if let Some(port) = port_override {
        changes.push((OsString::from("PG_PORT"), Some(port)));
    }

    if matches!(detect_execution_privileges(), ExecutionPrivileges::Root)
        && std::env::var_os("PG_EMBEDDED_WORKER").is_none()
    {
        let worker_path = locate_pg_worker_path().ok_or_else(|| {
            Box::new(std::io::Error::new(
                ErrorKind::NotFound,
                "PG_EMBEDDED_WORKER is not set and pg_worker binary was not found",
            )) as BoxError
        })?;

        let prepared_worker = prepare_pg_worker(&worker_path)?;
        changes.push((OsString::from("PG_EMBEDDED_WORKER"), Some(prepared_worker)));
    }

    Ok(changes)
}

fn locate_pg_worker_path() -> Option<OsString> {
    std::env::var_os("CARGO_BIN_EXE_pg_worker")
        .or_else(locate_pg_worker_near_target)
        .or_else(locate_pg_worker_in_path)
}

/// Copies the worker next to the temp dir so an unprivileged user can
/// execute it; the build directory may not be world-readable.
fn prepare_pg_worker(worker: &OsString) -> Result<OsString, BoxError> {
    static WORKER_CACHE: OnceLock<OsString> = OnceLock::new();
    if let Some(cached) = WORKER_CACHE.get() {
        return Ok(cached.clone());
    }

    let destination =
        std::env::temp_dir().join(format!("pg_worker_{pid}", pid = std::process::id()));
    match std::fs::remove_file(&destination) {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => return Err(Box::new(err) as BoxError),
    }
    std::fs::copy(worker, &destination).map_err(|err| Box::new(err) as BoxError)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&destination, std::fs::Permissions::from_mode(0o755))
            .map_err(|err| Box::new(err) as BoxError)?;
    }

    let prepared = destination.into_os_string();
    if WORKER_CACHE.set(prepared.clone()).is_err() {
        // Another test stored the prepared worker path first.
    }
    Ok(prepared)
}

fn locate_pg_worker_near_target() -> Option<OsString> {
    let exe = std::env::current_exe().ok()?;
    let deps_dir = exe.parent()?;
    let target_dir = deps_dir.parent()?;
    let worker_path = target_dir.join("pg_worker");
    worker_path.is_file().then(|| worker_path.into_os_string())
}

fn locate_pg_worker_in_path() -> Option<OsString> {
    let path = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path) {
        let candidate = dir.join("pg_worker");
        if candidate.is_file() {
            return Some(candidate.into_os_string());
        }
    }
    None
}

fn resolve_pg_port() -> Result<Option<OsString>, BoxError> {
    if std::env::var_os("PG_PORT").is_some() {
        return Ok(None);
    }

    let listener = TcpListener::bind(("127.0.0.1", 0)).map_err(|err| Box::new(err) as BoxError)?;
    let port = listener
        .local_addr()
        .map(|addr| addr.port())
        .map_err(|err| Box::new(err) as BoxError)?;
    drop(listener);

    Ok(Some(OsString::from(port.to_string())))
}

/// Applies environment changes and restores the previous values on drop.
struct EnvVarGuard {
    previous: Vec<(OsString, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    fn set_many(changes: &[(OsString, Option<OsString>)]) -> Self {
        let lock = ENV_MUTEX.get_or_init(|| Mutex::new(()));
        let guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut previous = Vec::with_capacity(changes.len());
        for (key, value) in changes {
            previous.push((key.clone(), std::env::var_os(key)));
            match value {
                // SAFETY: the guard holds the global environment lock, so
                // no other guarded caller mutates the environment while
                // this set_var executes.
                Some(new_value) => unsafe { std::env::set_var(key, new_value) },
                // SAFETY: as above, the global environment lock is held.
                None => unsafe { std::env::remove_var(key) },
            }
        }
        Self {
            previous,
            _lock: guard,
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            match value {
                // SAFETY: the environment lock is still held until the
                // guard finishes dropping.
                Some(old_value) => unsafe { std::env::set_var(&key, old_value) },
                // SAFETY: as above, the environment lock is still held.
                None => unsafe { std::env::remove_var(&key) },
            }
        }
    }
}
