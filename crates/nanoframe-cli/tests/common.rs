#![allow(dead_code)]
use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestEnv {
    _dir: TempDir,
    pub cfg: PathBuf,
    pub root: PathBuf,
    data: PathBuf,
    scratch: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().to_path_buf();
        let cfg = root.join("config");
        std::fs::create_dir_all(cfg.join("nanoframe")).expect("cfg dir");
        let env = Self {
            _dir: dir,
            cfg,
            root: root.clone(),
            data: root.join("data"),
            scratch: root.join("scratch"),
        };
        env.write_settings(None);
        env
    }

    pub fn bin(&self) -> Command {
        let mut cmd = Command::cargo_bin("nanoframe").unwrap();
        cmd.env("XDG_CONFIG_HOME", &self.cfg);
        cmd
    }

    /// Points the settings file at a proxy prefix; storage stays inside
    /// the temp dir either way.
    pub fn set_proxy(&self, url: &str) {
        self.write_settings(Some(url));
    }

    fn write_settings(&self, proxy: Option<&str>) {
        let mut s = String::new();
        if let Some(url) = proxy {
            s.push_str(&format!("[proxy]\nurl = \"{url}\"\n\n"));
        }
        s.push_str(&format!(
            "[storage]\ndata_dir = \"{}\"\nscratch_dir = \"{}\"\n",
            self.data.display(),
            self.scratch.display()
        ));
        std::fs::write(self.cfg.join("nanoframe").join("settings.toml"), s).expect("settings");
    }

    pub fn write_png(&self, name: &str) -> PathBuf {
        let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([160, 32, 240, 255]));
        let path = self.root.join(name);
        img.save(&path).expect("png fixture");
        path
    }

    pub fn write_file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.root.join(name);
        std::fs::write(&path, contents).expect("fixture");
        path
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([1, 2, 3, 255]));
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).expect("png");
    buf.into_inner()
}

pub fn png_data_uri() -> String {
    use base64::{engine::general_purpose, Engine as _};
    format!(
        "data:image/png;base64,{}",
        general_purpose::STANDARD.encode(png_bytes())
    )
}
