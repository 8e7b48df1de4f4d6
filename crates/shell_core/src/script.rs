//! Scripts injected into the embedded page.
//!
//! They are the page half of the bridge: everything they post must decode with
//! [`crate::BridgeMessage::decode`].

use crate::ShellFeatures;

/// Installs `window.webViewFileSaver` (and the `window.saveAs` alias) before page content loads.
///
/// `saveAs` reads the blob as a data URL, strips the prefix and posts an
/// `IMAGE_CAPTURE` or `EXCEL_EXPORT` message depending on the blob's MIME type.
/// `captureElement` renders a DOM element through `html2canvas`, which the page
/// must already have loaded.
pub const FILE_SAVER_SCRIPT: &str = r#"(function() {
  var post = function(message) {
    message.version = 1;
    window.ReactNativeWebView.postMessage(JSON.stringify(message));
  };

  window.webViewFileSaver = {
    saveAs: function(blob, filename, mimeType, dialogTitle) {
      return new Promise(function(resolve, reject) {
        var reader = new FileReader();
        reader.onloadend = function() {
          var base64data = String(reader.result).split(',')[1];
          post({
            type: blob.type.includes('image') ? 'IMAGE_CAPTURE' : 'EXCEL_EXPORT',
            filename: filename,
            data: base64data,
            mimeType: blob.type || mimeType,
            dialogTitle: dialogTitle
          });
          resolve();
        };
        reader.onerror = reject;
        reader.readAsDataURL(blob);
      });
    },

    captureElement: async function(element, filename) {
      try {
        if (typeof html2canvas !== 'function') {
          throw new Error('html2canvas not loaded');
        }
        var canvas = await html2canvas(element, { useCORS: true, scale: 2 });
        var saver = this;
        return new Promise(function(resolve, reject) {
          canvas.toBlob(function(blob) {
            saver.saveAs(blob, filename, 'image/png', 'Save Image').then(resolve, reject);
          }, 'image/png');
        });
      } catch (error) {
        console.error('Capture error:', error);
        throw error;
      }
    }
  };

  window.saveAs = window.webViewFileSaver.saveAs;
  true;
})();"#;

/// Reports clicks on `blob:` anchors instead of letting the surface navigate to them.
pub const BLOB_LINK_SCRIPT: &str = r#"(function() {
  document.addEventListener('click', function(e) {
    var anchor = e.target.closest('a[href^="blob:"]');
    if (anchor) {
      e.preventDefault();
      window.ReactNativeWebView.postMessage(JSON.stringify({
        type: 'BLOB_URL_CLICKED',
        url: anchor.href,
        version: 1
      }));
    }
  }, true);
  true;
})();"#;

/// Scripts the host should inject for this deployment, in injection order.
pub fn injected_scripts(features: &ShellFeatures) -> Vec<&'static str> {
    let mut scripts = Vec::new();
    if features.bridge {
        scripts.push(FILE_SAVER_SCRIPT);
        scripts.push(BLOB_LINK_SCRIPT);
    }
    scripts
}
