use crate::error::{HeroError, Result};
use crate::script::render::CompiledScript;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

impl CompiledScript {
	/// Write the script into `dir` as an executable file.
	///
	/// The body goes to a temporary file in `dir` first and is renamed into
	/// place, so readers never see a partial script. An existing script with
	/// the same name is replaced.
	pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
		let path = dir.join(&self.file_name);
		let write_error = |source: std::io::Error| HeroError::ScriptWriteError {
			path: path.clone(),
			source,
		};

		std::fs::create_dir_all(dir).map_err(write_error)?;

		let mut tmp = tempfile::Builder::new()
			.prefix(".hero-")
			.suffix(".sh.tmp")
			.tempfile_in(dir)
			.map_err(write_error)?;
		tmp.write_all(self.body.as_bytes()).map_err(write_error)?;
		tmp.as_file().sync_all().map_err(write_error)?;

		#[cfg(unix)]
		{
			use std::os::unix::fs::PermissionsExt;
			tmp.as_file()
				.set_permissions(std::fs::Permissions::from_mode(0o755))
				.map_err(write_error)?;
		}

		tmp.persist(&path).map_err(|err| write_error(err.error))?;

		info!(script = %path.display(), experiment = %self.experiment, "wrote job script");
		Ok(path)
	}
}
