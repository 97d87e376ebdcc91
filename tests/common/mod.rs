#![allow(dead_code)]

pub mod fixtures {
    use strictapi::field::FieldType;
    use strictapi::schema::{ApiSchema, ApiSchemaBuilder, FieldOptions};

    /// The widget API: one object, one route, a handler that always
    /// returns id 1 and leaves `note` unset.
    pub fn widget_api() -> ApiSchema {
        let mut api = ApiSchemaBuilder::new();
        api.enable_spec(true)
            .define_object("widget", |obj| {
                obj.description("A widget")
                    .field("name", FieldOptions::new(FieldType::String).required())?
                    .field("id", FieldOptions::new(FieldType::Integer).required())?
                    .field("note", FieldOptions::new(FieldType::String))?;
                Ok(())
            })
            .unwrap()
            .define_route("/create_widget", |route| {
                route
                    .description("Creates a widget")
                    .parameter("name", FieldOptions::new(FieldType::String).required())?
                    .parameter("make_public", FieldOptions::new(FieldType::Boolean))?
                    .response_object(|r| {
                        r.object("widget", "widget")?;
                        Ok(())
                    })?
                    .respond(|params, response| {
                        let name = params.string("name").unwrap_or_default().to_string();
                        let widget = response.object_mut("widget")?;
                        widget.set("name", name)?;
                        widget.set("id", 1)?;
                        Ok(())
                    });
                Ok(())
            })
            .unwrap();
        api.build()
    }
}

pub mod temp_files {
    use std::io::Write;

    /// Writes `content` to a temporary file ending in `.{ext}`.
    pub fn create_temp_file(content: &str, ext: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("strictapi_test_")
            .suffix(&format!(".{ext}"))
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }
}

pub mod http {
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpStream};
    use std::time::Duration;

    /// Sends a raw HTTP/1.1 request and reads one response.
    ///
    /// Reading stops once `Content-Length` bytes of body have arrived, so
    /// keep-alive connections do not stall the test.
    pub fn send_request(addr: &SocketAddr, req: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(req.as_bytes()).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_millis(500)))
            .unwrap();
        let mut buf = Vec::new();
        loop {
            let mut tmp = [0u8; 1024];
            match stream.read(&mut tmp) {
                Ok(0) => break,
                Ok(n) => {
                    buf.extend_from_slice(&tmp[..n]);
                    if is_complete(&buf) {
                        break;
                    }
                }
                Err(ref e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    break
                }
                Err(e) => panic!("read error: {e:?}"),
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    fn is_complete(buf: &[u8]) -> bool {
        let text = String::from_utf8_lossy(buf);
        let Some((head, body)) = text.split_once("\r\n\r\n") else {
            return false;
        };
        let length = head.lines().find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        });
        match length {
            Some(n) => body.len() >= n,
            None => false,
        }
    }

    /// Status code, content type and body of a raw response.
    pub fn parse_response(resp: &str) -> (u16, String, String) {
        let (headers, body) = resp.split_once("\r\n\r\n").unwrap_or((resp, ""));
        let mut status = 0;
        let mut content_type = String::new();
        for line in headers.lines() {
            if line.starts_with("HTTP/1.1") {
                status = line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("0")
                    .parse()
                    .unwrap();
            } else if let Some((name, val)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-type") {
                    content_type = val.trim().to_string();
                }
            }
        }
        (status, content_type, body.to_string())
    }
}

pub mod test_server {
    use std::net::{SocketAddr, TcpListener};
    use std::sync::{Arc, Once};
    use strictapi::dispatcher::Dispatcher;
    use strictapi::server::{ApiService, HttpServer, ServerHandle};

    /// Ensures May coroutines are configured only once
    static MAY_INIT: Once = Once::new();

    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_stack_size(0x8000);
        });
    }

    /// Starts `dispatcher` on a free local port.
    pub fn start(dispatcher: Dispatcher) -> (ServerHandle, SocketAddr) {
        setup_may_runtime();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let handle = HttpServer(ApiService::new(Arc::new(dispatcher)))
            .start(addr)
            .unwrap();
        handle.wait_ready().unwrap();
        (handle, addr)
    }
}
