//! Valores de tipo archivo y su lectura en streaming.
//!
//! Un `FileValue` representa el contenido de un campo archivo que puede
//! vivir en memoria, en disco o detrás de un handle abierto. Las tres
//! fuentes son mutuamente excluyentes, así que se modelan como variantes de
//! `FileBody` y no como campos opcionales cuya validez depende de
//! combinaciones en runtime.

use std::fs;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::errors::CodecError;

/// MIME por defecto cuando el llamador no declara uno.
pub const DEFAULT_MIME: &str = "application/octet-stream";

/// Bloque de lectura para el iterador crudo.
const RAW_BLOCK: usize = 64 * 1024;
/// Bloque de lectura del encoder base64 en streaming. Múltiplo de 3 para que
/// los segmentos codificados concatenen en un único base64 válido sin
/// padding intermedio.
const BASE64_BLOCK: usize = 24576;

/// Dónde vive el contenido de un `FileValue`.
#[derive(Debug)]
pub enum FileBody {
    /// Secuencia finita de chunks en memoria. `dest`, si está presente, es
    /// la ruta absoluta donde `rollover` debe persistirlos.
    Buffered { data: Vec<Vec<u8>>, dest: Option<PathBuf> },
    /// Contenido ya persistido en una ruta absoluta.
    OnDisk { path: PathBuf },
    /// Recurso legible ya abierto; se usa sólo cuando no hay ruta conocida.
    OpenHandle { file: fs::File },
}

/// Valor de un campo de tipo archivo.
#[derive(Debug)]
pub struct FileValue {
    /// Nombre original del archivo (sin componentes de ruta).
    pub name: Option<String>,
    /// Tipo MIME del contenido.
    pub mime_type: String,
    body: FileBody,
}

impl FileValue {
    /// Contenido en memoria como secuencia de chunks.
    pub fn buffered(data: Vec<Vec<u8>>) -> Self {
        Self { name: None,
               mime_type: DEFAULT_MIME.to_string(),
               body: FileBody::Buffered { data, dest: None } }
    }

    /// Contenido ya persistido. La ruta debe ser absoluta.
    pub fn on_disk(path: impl Into<PathBuf>) -> Result<Self, CodecError> {
        let path = path.into();
        if !path.is_absolute() {
            return Err(CodecError::Usage(format!("la ruta de un FileValue debe ser absoluta: {}",
                                                 path.display())));
        }
        Ok(Self { name: None,
                  mime_type: DEFAULT_MIME.to_string(),
                  body: FileBody::OnDisk { path } })
    }

    /// Contenido detrás de un handle ya abierto.
    pub fn from_handle(file: fs::File) -> Self {
        Self { name: None,
               mime_type: DEFAULT_MIME.to_string(),
               body: FileBody::OpenHandle { file } }
    }

    /// Declara el nombre original. Debe ser un nombre pelado, sin separadores.
    pub fn with_name(mut self, name: impl Into<String>) -> Result<Self, CodecError> {
        let name = name.into();
        if Path::new(&name).file_name().map(|n| n.to_string_lossy() != name.as_str()).unwrap_or(true) {
            return Err(CodecError::Usage(format!("el nombre no puede llevar componentes de ruta: {name:?}")));
        }
        self.name = Some(name);
        Ok(self)
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Fija la ruta destino del rollover para contenido en memoria.
    pub fn with_dest(mut self, dest: impl Into<PathBuf>) -> Result<Self, CodecError> {
        let dest = dest.into();
        if !dest.is_absolute() {
            return Err(CodecError::Usage(format!("la ruta destino debe ser absoluta: {}", dest.display())));
        }
        match &mut self.body {
            FileBody::Buffered { dest: slot, .. } => {
                *slot = Some(dest);
                Ok(self)
            }
            _ => Err(CodecError::Usage("la ruta destino sólo aplica a contenido en memoria".into())),
        }
    }

    pub fn body(&self) -> &FileBody {
        &self.body
    }

    /// Ruta conocida del contenido: la actual si está en disco, la destino
    /// si aún vive en memoria.
    pub fn path(&self) -> Option<&Path> {
        match &self.body {
            FileBody::OnDisk { path } => Some(path),
            FileBody::Buffered { dest, .. } => dest.as_deref(),
            FileBody::OpenHandle { .. } => None,
        }
    }

    /// Normaliza el valor garantizando que el contenido resida en disco en
    /// una ruta conocida.
    ///
    /// - En memoria: drena los chunks a `dest` o a un temporal recién
    ///   creado, fija `name` desde el basename si faltaba y pasa a `OnDisk`.
    /// - Ya en disco: no hace nada (intención idempotente).
    /// - Handle abierto: error de uso; no hay datos en memoria que drenar.
    pub fn rollover(&mut self) -> Result<(), CodecError> {
        let (data, dest) = match &mut self.body {
            FileBody::OnDisk { .. } => return Ok(()),
            FileBody::OpenHandle { .. } => {
                return Err(CodecError::Usage("rollover requiere contenido en memoria o una ruta destino".into()));
            }
            FileBody::Buffered { data, dest } => (std::mem::take(data), dest.take()),
        };

        let path = match dest {
            Some(path) => {
                let mut f = fs::File::create(&path)?;
                for chunk in &data {
                    f.write_all(chunk)?;
                }
                path
            }
            None => {
                let tmp = tempfile::NamedTempFile::new()?;
                let (mut f, path) = tmp.keep().map_err(|e| CodecError::Io(e.error))?;
                for chunk in &data {
                    f.write_all(chunk)?;
                }
                path
            }
        };

        if self.name.is_none() {
            self.name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        }
        tracing::debug!(path = %path.display(), "contenido de archivo persistido en rollover");
        self.body = FileBody::OnDisk { path };
        Ok(())
    }

    /// Iterador crudo sobre el contenido, chunk a chunk. El handle que abre
    /// (o duplica) es propiedad del iterador y se libera al soltarlo, tanto
    /// por agotamiento como por abandono temprano.
    pub fn chunks(&self) -> Result<FileChunks, CodecError> {
        let source = match &self.body {
            FileBody::Buffered { data, .. } => ChunkSource::Buffered(data.clone().into_iter()),
            FileBody::OnDisk { path } => ChunkSource::Reader(fs::File::open(path)?),
            FileBody::OpenHandle { file } => {
                let mut dup = file.try_clone()?;
                dup.seek(SeekFrom::Start(0))?;
                ChunkSource::Reader(dup)
            }
        };
        Ok(FileChunks { source })
    }

    /// Encoder base64 en streaming sobre el contenido ya persistido. Nunca
    /// materializa el archivo completo: lee bloques fijos y entrega la forma
    /// codificada de cada uno.
    pub fn base64_chunks(&self) -> Result<Base64FileChunks, CodecError> {
        match &self.body {
            FileBody::OnDisk { path } => Ok(Base64FileChunks { file: fs::File::open(path)? }),
            _ => Err(CodecError::Usage("hay que persistir el contenido (rollover) antes de releerlo".into())),
        }
    }

    /// Decodifica un blob base64 completo a un valor con un único chunk en
    /// memoria (operación de un solo paso, sin re-trocear).
    pub fn from_base64(value: &[u8]) -> Result<FileValue, CodecError> {
        let decoded = STANDARD.decode(value)
                              .map_err(|e| CodecError::validation(String::from_utf8_lossy(value), e.to_string()))?;
        Ok(FileValue::buffered(vec![decoded]))
    }
}

enum ChunkSource {
    Buffered(std::vec::IntoIter<Vec<u8>>),
    Reader(fs::File),
}

/// Iterador crudo de chunks de un `FileValue`.
pub struct FileChunks {
    source: ChunkSource,
}

impl Iterator for FileChunks {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.source {
            ChunkSource::Buffered(it) => it.next().map(Ok),
            ChunkSource::Reader(file) => read_block(file, RAW_BLOCK),
        }
    }
}

/// Encoder base64 en streaming; entrega cada bloque ya codificado.
pub struct Base64FileChunks {
    file: fs::File,
}

impl Iterator for Base64FileChunks {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match read_block(&mut self.file, BASE64_BLOCK)? {
            Ok(block) => Some(Ok(STANDARD.encode(&block))),
            Err(e) => Some(Err(e)),
        }
    }
}

/// Lee hasta `cap` bytes; `None` al agotarse el recurso.
fn read_block(file: &mut fs::File, cap: usize) -> Option<io::Result<Vec<u8>>> {
    let mut buf = vec![0u8; cap];
    let mut filled = 0;
    while filled < cap {
        match file.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Some(Err(e)),
        }
    }
    if filled == 0 {
        return None;
    }
    buf.truncate(filled);
    Some(Ok(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollover_persists_buffered_data() {
        let mut value = FileValue::buffered(vec![b"hola ".to_vec(), b"mundo".to_vec()]);
        value.rollover().expect("rollover debe persistir");

        let path = value.path().expect("debe haber ruta tras rollover").to_path_buf();
        assert!(path.is_absolute());
        assert!(value.name.as_deref().is_some_and(|n| !n.is_empty()));
        assert!(matches!(value.body(), FileBody::OnDisk { .. }), "los datos ya no viven en memoria");

        let contents = fs::read(&path).expect("el archivo existe");
        assert_eq!(contents, b"hola mundo");
        fs::remove_file(path).ok();
    }

    #[test]
    fn rollover_is_idempotent_on_disk() {
        let mut value = FileValue::buffered(vec![b"x".to_vec()]);
        value.rollover().expect("primer rollover");
        let path = value.path().map(Path::to_path_buf);
        value.rollover().expect("segundo rollover no falla");
        assert_eq!(value.path().map(Path::to_path_buf), path);
        path.map(fs::remove_file);
    }

    #[test]
    fn rollover_on_open_handle_is_usage_error() {
        let tmp = tempfile::tempfile().expect("temporal anónimo");
        let mut value = FileValue::from_handle(tmp);
        match value.rollover() {
            Err(CodecError::Usage(_)) => {}
            other => panic!("se esperaba Usage, hubo {other:?}"),
        }
    }

    #[test]
    fn rollover_honors_destination_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dest = dir.path().join("salida.bin");
        let mut value = FileValue::buffered(vec![b"abc".to_vec()]).with_dest(&dest)
                                                                  .expect("destino absoluto");
        value.rollover().expect("rollover a destino");
        assert_eq!(value.path(), Some(dest.as_path()));
        assert_eq!(fs::read(&dest).expect("existe"), b"abc");
    }

    #[test]
    fn name_with_path_separator_is_rejected() {
        let err = FileValue::buffered(vec![]).with_name("../evil.bin").unwrap_err();
        assert!(matches!(err, CodecError::Usage(_)));
    }

    #[test]
    fn relative_on_disk_path_is_rejected() {
        let err = FileValue::on_disk("relativa.bin").unwrap_err();
        assert!(matches!(err, CodecError::Usage(_)));
    }

    #[test]
    fn base64_stream_round_trips_after_rollover() {
        // Más de un bloque para ejercitar la concatenación de segmentos.
        let payload: Vec<u8> = (0..60000u32).map(|i| (i % 251) as u8).collect();
        let mut value = FileValue::buffered(vec![payload.clone()]);
        value.rollover().expect("rollover");

        let mut encoded = String::new();
        for piece in value.base64_chunks().expect("stream base64") {
            encoded.push_str(&piece.expect("lectura"));
        }
        let decoded = STANDARD.decode(encoded.as_bytes()).expect("base64 concatenado válido");
        assert_eq!(decoded, payload);

        value.path().map(|p| fs::remove_file(p).ok());
    }

    #[test]
    fn base64_stream_requires_persisted_content() {
        let value = FileValue::buffered(vec![b"abc".to_vec()]);
        assert!(matches!(value.base64_chunks(), Err(CodecError::Usage(_))));
    }

    #[test]
    fn raw_chunks_from_buffered_and_handle() {
        let value = FileValue::buffered(vec![b"ab".to_vec(), b"cd".to_vec()]);
        let collected: Vec<Vec<u8>> = value.chunks()
                                           .expect("iterador")
                                           .map(|c| c.expect("chunk"))
                                           .collect();
        assert_eq!(collected, vec![b"ab".to_vec(), b"cd".to_vec()]);

        let mut tmp = tempfile::tempfile().expect("temporal");
        tmp.write_all(b"contenido").expect("escritura");
        let value = FileValue::from_handle(tmp);
        let collected: Vec<u8> = value.chunks()
                                      .expect("iterador")
                                      .flat_map(|c| c.expect("chunk"))
                                      .collect();
        assert_eq!(collected, b"contenido");
    }

    #[test]
    fn from_base64_yields_single_buffered_chunk() {
        let encoded = STANDARD.encode(b"carga");
        let value = FileValue::from_base64(encoded.as_bytes()).expect("base64 válido");
        match value.body() {
            FileBody::Buffered { data, .. } => assert_eq!(data, &vec![b"carga".to_vec()]),
            other => panic!("se esperaba Buffered, hubo {other:?}"),
        }
        assert_eq!(value.mime_type, DEFAULT_MIME);
    }

    #[test]
    fn from_base64_rejects_garbage() {
        assert!(matches!(FileValue::from_base64(b"@@@@"), Err(CodecError::Validation { .. })));
    }
}
