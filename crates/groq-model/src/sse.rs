#[cfg(test)]
use std::collections::VecDeque;

use bytes::Bytes;
use reqwest::Response;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    Transport,
    InvalidPayload,
}

enum ByteSource {
    Response(Response),
    #[cfg(test)]
    Preset(VecDeque<Bytes>),
}

impl ByteSource {
    #[inline]
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, Error> {
        match self {
            ByteSource::Response(response) => {
                response.chunk().await.map_err(|_| Error::Transport)
            }
            #[cfg(test)]
            ByteSource::Preset(chunks) => Ok(chunks.pop_front()),
        }
    }
}

/// A type for reading server-sent events from a streaming response body.
pub struct Sse {
    buf: String,
    source: ByteSource,
}

impl Sse {
    #[inline]
    pub fn from_response(response: Response) -> Self {
        Self {
            buf: String::new(),
            source: ByteSource::Response(response),
        }
    }

    #[cfg(test)]
    pub fn from_preset(chunks: VecDeque<Bytes>) -> Self {
        Self {
            buf: String::new(),
            source: ByteSource::Preset(chunks),
        }
    }

    pub async fn next_event(&mut self) -> Result<Option<String>, Error> {
        loop {
            // Read more data from the stream first.
            let mut has_more_data = false;
            if let Some(bytes) = self.source.next_chunk().await? {
                let Ok(s) = str::from_utf8(&bytes) else {
                    return Err(Error::InvalidPayload);
                };
                self.buf.push_str(s);
                has_more_data = true;
            }

            // There are data in the buffer, try to parse an event. If the data
            // is not enough to parse an event, we need to read more.
            if let Some(event) = self.try_parse_event()? {
                return Ok(Some(event));
            }

            // Abort if no more data available.
            if !has_more_data {
                return Ok(None);
            }
        }
    }

    fn try_parse_event(&mut self) -> Result<Option<String>, Error> {
        loop {
            if self.buf.is_empty() {
                return Ok(None);
            }

            // Events are separated by a blank line. Both bare line feeds
            // and CRLF pairs count as line terminators.
            //
            // event         = *( comment / field ) end-of-line
            // field         = 1*name-char [ colon [ space ] *any-char ] end-of-line
            // end-of-line   = ( cr lf / cr / lf )
            let Some((boundary_idx, boundary_len)) =
                find_event_boundary(&self.buf)
            else {
                return Ok(None);
            };

            let field = self.buf[0..boundary_idx].to_owned();
            self.buf.drain(0..boundary_idx + boundary_len);

            // Comment fields only keep the connection alive.
            if field.starts_with(':') {
                continue;
            }

            // Parse the field line.
            let Some(data) = field.strip_prefix("data:") else {
                // Other fields are not supported.
                return Err(Error::InvalidPayload);
            };
            let data = data.strip_prefix(' ').unwrap_or(data);
            return Ok(Some(data.to_owned()));
        }
    }
}

fn find_event_boundary(buf: &str) -> Option<(usize, usize)> {
    let lf = buf.find("\n\n").map(|idx| (idx, 2));
    let crlf = buf.find("\r\n\r\n").map(|idx| (idx, 4));
    match (lf, crlf) {
        (Some(lf), Some(crlf)) => {
            if crlf.0 < lf.0 {
                Some(crlf)
            } else {
                Some(lf)
            }
        }
        (lf, crlf) => lf.or(crlf),
    }
}
