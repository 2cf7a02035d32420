//! snapshot — сериализация allocated-множества и атомарный коммит на диск.
//!
//! Формат файла (LE):
//! - count: u64 — число записей;
//! - далее count раз: [len u64][len байт UTF‑8].
//! Записи идут в каноническом порядке пула (детерминизм + диффабельность).
//!
//! Протокол записи:
//! - пишем во временный файл `<path>.tmp` в том же каталоге;
//! - sync, затем rename поверх целевого пути; rename — единственный
//!   наблюдаемый извне переход состояния;
//! - fsync родительского каталога (best‑effort на Windows).
//! При любом сбое прежний снапшот остаётся целым.
//!
//! Протокол чтения:
//! - отсутствие файла — пустое множество (первый запуск), не ошибка;
//! - усечение, завышенная длина, хвостовой мусор, не‑UTF‑8 — фатальная
//!   PersistenceFailure без частичного восстановления: недочитанный
//!   allocated-набор означал бы повторную выдачу занятого идентификатора.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use crate::errors::PoolError;

#[cfg(unix)]
fn fsync_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            let dir = File::open(parent)?;
            dir.sync_all()?;
        }
    }
    Ok(())
}
#[cfg(not(unix))]
fn fsync_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".tmp");
    PathBuf::from(os)
}

/// Записать множество идентификаторов в `path` атомарно.
/// `ids` должны быть уже в каноническом порядке. Возвращает размер файла.
pub fn take<S: AsRef<str>>(ids: &[S], path: &Path, fsync: bool) -> Result<u64, PoolError> {
    let tmp = tmp_path(path);
    let _ = fs::remove_file(&tmp); // остаток от упавшего writer'а

    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&tmp)
        .map_err(|e| PoolError::persistence("open tmp", &tmp, e))?;

    let mut written: u64 = 0;
    let res = (|| -> io::Result<()> {
        f.write_u64::<LittleEndian>(ids.len() as u64)?;
        written += 8;
        for id in ids {
            let b = id.as_ref().as_bytes();
            f.write_u64::<LittleEndian>(b.len() as u64)?;
            f.write_all(b)?;
            written += 8 + b.len() as u64;
        }
        if fsync {
            f.sync_all()?;
        }
        Ok(())
    })();
    if let Err(e) = res {
        let _ = fs::remove_file(&tmp);
        return Err(PoolError::persistence("write tmp", &tmp, e));
    }
    drop(f);

    fs::rename(&tmp, path).map_err(|e| PoolError::persistence("rename", path, e))?;
    if fsync {
        let _ = fsync_dir(path);
    }
    Ok(written)
}

/// Прочитать снапшот. Отсутствующий файл — Ok(пусто).
pub fn restore(path: &Path) -> Result<Vec<String>, PoolError> {
    let mut f = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(PoolError::persistence("open", path, e)),
    };

    let file_len = f
        .metadata()
        .map_err(|e| PoolError::persistence("stat", path, e))?
        .len();
    if file_len < 8 {
        return Err(PoolError::corrupt(path, "file shorter than count header"));
    }

    let count = f
        .read_u64::<LittleEndian>()
        .map_err(|e| PoolError::persistence("read", path, e))?;
    let mut remaining = file_len - 8;

    let mut ids = Vec::with_capacity(count.min(remaining / 8) as usize);
    for i in 0..count {
        if remaining < 8 {
            return Err(PoolError::corrupt(
                path,
                format!("truncated at entry {} of {}", i, count),
            ));
        }
        let len = f
            .read_u64::<LittleEndian>()
            .map_err(|e| PoolError::persistence("read", path, e))?;
        remaining -= 8;
        if len > remaining {
            return Err(PoolError::corrupt(
                path,
                format!("entry {} length {} exceeds remaining {} bytes", i, len, remaining),
            ));
        }
        let mut buf = vec![0u8; len as usize];
        f.read_exact(&mut buf)
            .map_err(|e| PoolError::persistence("read", path, e))?;
        remaining -= len;
        let id = String::from_utf8(buf)
            .map_err(|_| PoolError::corrupt(path, format!("entry {} is not UTF-8", i)))?;
        ids.push(id);
    }

    if remaining != 0 {
        return Err(PoolError::corrupt(
            path,
            format!("{} trailing bytes after {} entries", remaining, count),
        ));
    }

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::ByteOrder;

    fn unique_path(tag: &str) -> PathBuf {
        let t = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("corral-snap-{}-{}-{}", tag, std::process::id(), t))
    }

    #[test]
    fn roundtrip_sorted_set() {
        let p = unique_path("rt");
        let ids = ["10.0.0.1", "10.0.0.2", "10.0.0.10"];
        let n = take(&ids, &p, true).unwrap();
        assert_eq!(n, 8 + ids.iter().map(|s| 8 + s.len() as u64).sum::<u64>());

        let back = restore(&p).unwrap();
        assert_eq!(back, vec!["10.0.0.1", "10.0.0.2", "10.0.0.10"]);

        // tmp не должен переживать успешный коммит
        assert!(!tmp_path(&p).exists());
        let _ = fs::remove_file(&p);
    }

    #[test]
    fn empty_set_roundtrip() {
        let p = unique_path("empty");
        take::<&str>(&[], &p, false).unwrap();
        assert_eq!(restore(&p).unwrap(), Vec::<String>::new());
        let _ = fs::remove_file(&p);
    }

    #[test]
    fn missing_file_is_first_run() {
        let p = unique_path("missing");
        assert_eq!(restore(&p).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn truncated_entry_is_fatal() {
        let p = unique_path("trunc");
        // count=2, но записана только одна запись
        let mut buf = Vec::new();
        let mut w8 = [0u8; 8];
        LittleEndian::write_u64(&mut w8, 2);
        buf.extend_from_slice(&w8);
        LittleEndian::write_u64(&mut w8, 4);
        buf.extend_from_slice(&w8);
        buf.extend_from_slice(b"ab12");
        fs::write(&p, &buf).unwrap();

        assert!(matches!(
            restore(&p),
            Err(PoolError::PersistenceFailure { .. })
        ));
        let _ = fs::remove_file(&p);
    }

    #[test]
    fn oversized_length_is_fatal() {
        let p = unique_path("len");
        let mut buf = Vec::new();
        let mut w8 = [0u8; 8];
        LittleEndian::write_u64(&mut w8, 1);
        buf.extend_from_slice(&w8);
        LittleEndian::write_u64(&mut w8, u64::MAX); // длина заведомо больше файла
        buf.extend_from_slice(&w8);
        fs::write(&p, &buf).unwrap();

        assert!(matches!(
            restore(&p),
            Err(PoolError::PersistenceFailure { .. })
        ));
        let _ = fs::remove_file(&p);
    }

    #[test]
    fn trailing_garbage_is_fatal() {
        let p = unique_path("tail");
        take(&["a"], &p, false).unwrap();
        let mut bytes = fs::read(&p).unwrap();
        bytes.push(0xFF);
        fs::write(&p, &bytes).unwrap();

        assert!(matches!(
            restore(&p),
            Err(PoolError::PersistenceFailure { .. })
        ));
        let _ = fs::remove_file(&p);
    }

    #[test]
    fn failed_take_keeps_previous_snapshot() {
        let p = unique_path("keep");
        take(&["one"], &p, true).unwrap();
        // Каталог для tmp отсутствует — take обязан упасть, не тронув p.
        let bad = p.join("sub").join("snapshot");
        assert!(matches!(
            take(&["two"], &bad, true),
            Err(PoolError::PersistenceFailure { .. })
        ));
        assert_eq!(restore(&p).unwrap(), vec!["one"]);
        let _ = fs::remove_file(&p);
    }
}
